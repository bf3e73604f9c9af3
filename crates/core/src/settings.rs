//! Store settings sections and the defaults-over-patch merge.
//!
//! The backend stores settings as independent JSON objects keyed by section
//! name. A section may be missing entirely or carry only some fields, so every
//! read goes through [`merge_section`]: the hard-coded defaults are the base
//! and whatever the backend returned is laid over them.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of a settings section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsSection {
    Store,
    Delivery,
    Payment,
    Social,
    Notification,
}

impl SettingsSection {
    /// Every section, in the order the settings form shows them.
    pub const ALL: [Self; 5] = [
        Self::Store,
        Self::Delivery,
        Self::Payment,
        Self::Social,
        Self::Notification,
    ];

    /// Key used by the backend.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Delivery => "delivery",
            Self::Payment => "payment",
            Self::Social => "social",
            Self::Notification => "notification",
        }
    }

    /// Heading for the settings form.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Store => "Cửa hàng",
            Self::Delivery => "Giao hàng",
            Self::Payment => "Thanh toán",
            Self::Social => "Mạng xã hội",
            Self::Notification => "Thông báo",
        }
    }

    /// Parse a backend key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.key() == key)
    }
}

impl fmt::Display for SettingsSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// General shop information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    pub name: String,
    pub tagline: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub opening_hours: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            name: "YenFlowers".to_string(),
            tagline: "Hoa tươi mỗi ngày".to_string(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            opening_hours: "07:00 - 21:00".to_string(),
        }
    }
}

/// Delivery fees and cut-offs. Amounts are in đồng.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySettings {
    pub default_fee: i64,
    pub free_shipping_threshold: i64,
    pub same_day_cutoff: String,
    pub express_enabled: bool,
    pub express_fee: i64,
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            default_fee: 30_000,
            free_shipping_threshold: 1_000_000,
            same_day_cutoff: "16:00".to_string(),
            express_enabled: true,
            express_fee: 60_000,
        }
    }
}

/// Enabled payment methods and bank transfer details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSettings {
    pub cod_enabled: bool,
    pub bank_transfer_enabled: bool,
    pub bank_name: String,
    pub bank_account_number: String,
    pub bank_account_holder: String,
    pub paypal_enabled: bool,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            cod_enabled: true,
            bank_transfer_enabled: true,
            bank_name: String::new(),
            bank_account_number: String::new(),
            bank_account_holder: String::new(),
            paypal_enabled: false,
        }
    }
}

/// Social profile links and the Facebook page used for feed sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSettings {
    pub facebook_url: String,
    pub instagram_url: String,
    pub zalo_phone: String,
    pub facebook_page_id: String,
}

/// Where order notifications go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub order_email: String,
    pub notify_new_order: bool,
    pub notify_low_stock: bool,
    pub low_stock_threshold: i64,
    pub reminder_days_before: i64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            order_email: String::new(),
            notify_new_order: true,
            notify_low_stock: false,
            low_stock_threshold: 5,
            reminder_days_before: 3,
        }
    }
}

/// Lay `patch` over `defaults`.
///
/// Every key of a JSON-object patch replaces the default's field; keys the
/// section does not know are dropped. A missing patch, a non-object patch, or
/// a patch whose values have the wrong type yields the defaults unchanged.
#[must_use]
pub fn merge_section<T>(defaults: &T, patch: Option<&Value>) -> T
where
    T: Serialize + DeserializeOwned + Clone,
{
    let Some(Value::Object(patch)) = patch else {
        if let Some(other) = patch {
            tracing::warn!(patch = %other, "Ignoring non-object settings patch");
        }
        return defaults.clone();
    };

    let Ok(Value::Object(mut base)) = serde_json::to_value(defaults) else {
        return defaults.clone();
    };

    for (key, value) in patch {
        if base.contains_key(key) && !value.is_null() {
            base.insert(key.clone(), value.clone());
        }
    }

    match serde_json::from_value(Value::Object(base)) {
        Ok(merged) => merged,
        Err(e) => {
            tracing::warn!(error = %e, "Settings patch has mismatched types, using defaults");
            defaults.clone()
        }
    }
}

/// All settings sections, each merged over its defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub store: StoreSettings,
    pub delivery: DeliverySettings,
    pub payment: PaymentSettings,
    pub social: SocialSettings,
    pub notification: NotificationSettings,
}

impl SiteSettings {
    /// Build from the backend's `section key -> value` map.
    ///
    /// Sections absent from the map keep all of their defaults.
    #[must_use]
    pub fn from_backend(sections: &HashMap<String, Value>) -> Self {
        let defaults = Self::default();
        let patch = |section: SettingsSection| sections.get(section.key());

        Self {
            store: merge_section(&defaults.store, patch(SettingsSection::Store)),
            delivery: merge_section(&defaults.delivery, patch(SettingsSection::Delivery)),
            payment: merge_section(&defaults.payment, patch(SettingsSection::Payment)),
            social: merge_section(&defaults.social, patch(SettingsSection::Social)),
            notification: merge_section(
                &defaults.notification,
                patch(SettingsSection::Notification),
            ),
        }
    }

    /// JSON payload of one section.
    ///
    /// # Errors
    ///
    /// Returns an error if the section cannot be serialized.
    pub fn section_payload(&self, section: SettingsSection) -> Result<Value, serde_json::Error> {
        match section {
            SettingsSection::Store => serde_json::to_value(&self.store),
            SettingsSection::Delivery => serde_json::to_value(&self.delivery),
            SettingsSection::Payment => serde_json::to_value(&self.payment),
            SettingsSection::Social => serde_json::to_value(&self.social),
            SettingsSection::Notification => serde_json::to_value(&self.notification),
        }
    }

    /// One payload per section, in [`SettingsSection::ALL`] order.
    ///
    /// # Errors
    ///
    /// Returns an error if any section cannot be serialized.
    pub fn section_payloads(&self) -> Result<Vec<(SettingsSection, Value)>, serde_json::Error> {
        SettingsSection::ALL
            .into_iter()
            .map(|section| Ok((section, self.section_payload(section)?)))
            .collect()
    }

    /// Replace one section from a JSON patch laid over the current values.
    pub fn apply_patch(&mut self, section: SettingsSection, patch: &Value) {
        match section {
            SettingsSection::Store => self.store = merge_section(&self.store, Some(patch)),
            SettingsSection::Delivery => {
                self.delivery = merge_section(&self.delivery, Some(patch));
            }
            SettingsSection::Payment => self.payment = merge_section(&self.payment, Some(patch)),
            SettingsSection::Social => self.social = merge_section(&self.social, Some(patch)),
            SettingsSection::Notification => {
                self.notification = merge_section(&self.notification, Some(patch));
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_merge_without_patch_is_defaults() {
        let merged = merge_section(&DeliverySettings::default(), None);
        assert_eq!(merged, DeliverySettings::default());
    }

    #[test]
    fn test_merge_overlays_present_fields_only() {
        let patch = json!({"default_fee": 35_000});
        let merged = merge_section(&DeliverySettings::default(), Some(&patch));
        assert_eq!(merged.default_fee, 35_000);
        assert_eq!(merged.free_shipping_threshold, 1_000_000);
        assert_eq!(merged.same_day_cutoff, "16:00");
    }

    #[test]
    fn test_merge_ignores_unknown_and_null_keys() {
        let patch = json!({"name": "Yến Flowers", "legacy_field": 1, "phone": null});
        let merged = merge_section(&StoreSettings::default(), Some(&patch));
        assert_eq!(merged.name, "Yến Flowers");
        assert_eq!(merged.phone, "");
    }

    #[test]
    fn test_merge_non_object_patch_keeps_defaults() {
        let patch = json!(["not", "an", "object"]);
        let merged = merge_section(&PaymentSettings::default(), Some(&patch));
        assert_eq!(merged, PaymentSettings::default());
    }

    #[test]
    fn test_merge_type_mismatch_keeps_defaults() {
        let patch = json!({"default_fee": "free"});
        let merged = merge_section(&DeliverySettings::default(), Some(&patch));
        assert_eq!(merged, DeliverySettings::default());
    }

    #[test]
    fn test_from_backend_omitted_sections_keep_defaults() {
        let mut sections = HashMap::new();
        sections.insert("store".to_string(), json!({"name": "Test Store"}));

        let settings = SiteSettings::from_backend(&sections);
        assert_eq!(settings.store.name, "Test Store");
        assert_eq!(settings.store.opening_hours, "07:00 - 21:00");
        assert_eq!(settings.delivery, DeliverySettings::default());
        assert_eq!(settings.payment, PaymentSettings::default());
        assert_eq!(settings.social, SocialSettings::default());
        assert_eq!(settings.notification, NotificationSettings::default());
    }

    #[test]
    fn test_from_backend_empty_map() {
        assert_eq!(SiteSettings::from_backend(&HashMap::new()), SiteSettings::default());
    }

    #[test]
    fn test_merge_order_independent_across_sections() {
        let pairs = vec![
            ("social".to_string(), json!({"zalo_phone": "0909"})),
            ("payment".to_string(), json!({"paypal_enabled": true})),
            ("store".to_string(), json!({"name": "Yến Flowers"})),
        ];
        let forward: HashMap<String, Value> = pairs.iter().cloned().collect();
        let backward: HashMap<String, Value> = pairs.iter().rev().cloned().collect();

        let merged = SiteSettings::from_backend(&forward);
        assert_eq!(merged, SiteSettings::from_backend(&backward));
        assert_eq!(merged.social.zalo_phone, "0909");
        assert!(merged.payment.paypal_enabled);
        assert_eq!(merged.store.name, "Yến Flowers");
    }

    #[test]
    fn test_section_payloads_cover_all_sections() {
        let payloads = SiteSettings::default().section_payloads().unwrap();
        let keys: Vec<&str> = payloads.iter().map(|(s, _)| s.key()).collect();
        assert_eq!(keys, vec!["store", "delivery", "payment", "social", "notification"]);
        assert!(payloads.iter().all(|(_, v)| v.is_object()));
    }

    #[test]
    fn test_apply_patch() {
        let mut settings = SiteSettings::default();
        settings.apply_patch(SettingsSection::Notification, &json!({"notify_low_stock": true}));
        assert!(settings.notification.notify_low_stock);
        assert_eq!(settings.notification.low_stock_threshold, 5);
    }

    #[test]
    fn test_section_from_key() {
        assert_eq!(SettingsSection::from_key("payment"), Some(SettingsSection::Payment));
        assert_eq!(SettingsSection::from_key("delivery_fees"), None);
    }
}
