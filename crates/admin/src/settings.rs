//! Settings load and save.
//!
//! Loading is one call merged over the defaults. Saving issues one update per
//! section, all at once, and reports how each one went. There is no rollback:
//! sections that succeeded stay saved when another fails.

use std::fmt;

use futures::future::join_all;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use yen_flowers_core::{SettingsSection, SiteSettings};

use crate::backend::{BackendError, SettingsClient};

/// How one section save went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionOutcome {
    pub section: SettingsSection,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-section result of a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    pub success: bool,
    pub sections: Vec<SectionOutcome>,
}

impl SaveReport {
    #[must_use]
    pub fn new(sections: Vec<SectionOutcome>) -> Self {
        Self {
            success: sections.iter().all(|outcome| outcome.ok),
            sections,
        }
    }

    /// Whether every section was saved.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Sections whose update failed.
    #[must_use]
    pub fn failed_sections(&self) -> Vec<SettingsSection> {
        self.sections
            .iter()
            .filter(|outcome| !outcome.ok)
            .map(|outcome| outcome.section)
            .collect()
    }
}

/// Settings persistence over the backend API.
#[derive(Clone)]
pub struct SettingsService {
    client: SettingsClient,
}

impl SettingsService {
    #[must_use]
    pub const fn new(client: SettingsClient) -> Self {
        Self { client }
    }

    /// Current settings, with anything the backend omits filled from defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<SiteSettings, BackendError> {
        let stored = self.client.fetch_all().await?;
        Ok(SiteSettings::from_backend(&stored))
    }

    /// Save every section.
    pub async fn save(&self, settings: &SiteSettings) -> SaveReport {
        self.save_sections(settings, &SettingsSection::ALL).await
    }

    /// Save the given sections concurrently.
    #[instrument(skip(self, settings))]
    pub async fn save_sections(
        &self,
        settings: &SiteSettings,
        sections: &[SettingsSection],
    ) -> SaveReport {
        let updates = sections.iter().map(|&section| async move {
            let result = match settings.section_payload(section) {
                Ok(payload) => self.client.patch_section(section, &payload).await,
                Err(e) => Err(BackendError::Parse(e)),
            };

            match result {
                Ok(()) => SectionOutcome {
                    section,
                    ok: true,
                    error: None,
                },
                Err(e) => {
                    warn!(error = %e, %section, "Failed to save settings section");
                    SectionOutcome {
                        section,
                        ok: false,
                        error: Some(e.to_string()),
                    }
                }
            }
        });

        let report = SaveReport::new(join_all(updates).await);
        if report.is_success() {
            info!(sections = sections.len(), "Settings saved");
        } else {
            sentry::capture_message(
                &format!(
                    "Settings save failed for: {}",
                    SectionList(&report.failed_sections())
                ),
                sentry::Level::Warning,
            );
        }
        report
    }
}

struct SectionList<'a>(&'a [SettingsSection]);

impl fmt::Display for SectionList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{section}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Form Binding
// =============================================================================

/// Error binding the settings form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid number in field {0}")]
pub struct FormError(pub String);

/// Build settings from `section.field` form pairs.
///
/// Field types follow the defaults: booleans are checkboxes (present means
/// `true`, absent means `false`), integers must parse, everything else is
/// text. Fields with unknown names are ignored; text and number fields that
/// are not submitted keep their default.
///
/// # Errors
///
/// Returns [`FormError`] naming the first integer field that does not parse.
pub fn settings_from_form(fields: &[(String, String)]) -> Result<SiteSettings, FormError> {
    let defaults = SiteSettings::default();
    let mut settings = defaults.clone();

    for section in SettingsSection::ALL {
        let Ok(Value::Object(shape)) = defaults.section_payload(section) else {
            continue;
        };

        let prefix = format!("{}.", section.key());
        let submitted: Vec<(&str, &str)> = fields
            .iter()
            .filter_map(|(name, value)| {
                name.strip_prefix(&prefix)
                    .map(|field| (field, value.as_str()))
            })
            .collect();

        let mut patch = Map::new();
        for (field, default) in &shape {
            let value = submitted
                .iter()
                .rev()
                .find(|(name, _)| *name == field.as_str())
                .map(|(_, value)| value.trim());

            let parsed = match (default, value) {
                (Value::Bool(_), value) => Value::Bool(value.is_some()),
                (Value::Number(_), Some(raw)) => raw
                    .parse::<i64>()
                    .map(Value::from)
                    .map_err(|_| FormError(format!("{prefix}{field}")))?,
                (_, Some(raw)) => Value::String(raw.to_string()),
                (_, None) => continue,
            };
            patch.insert(field.clone(), parsed);
        }

        settings.apply_patch(section, &Value::Object(patch));
    }

    Ok(settings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn test_report_success_requires_every_section() {
        let ok = |section| SectionOutcome {
            section,
            ok: true,
            error: None,
        };
        let report = SaveReport::new(vec![ok(SettingsSection::Store), ok(SettingsSection::Social)]);
        assert!(report.is_success());

        let report = SaveReport::new(vec![
            ok(SettingsSection::Store),
            SectionOutcome {
                section: SettingsSection::Payment,
                ok: false,
                error: Some("Backend returned 500".to_string()),
            },
        ]);
        assert!(!report.is_success());
        assert_eq!(report.failed_sections(), vec![SettingsSection::Payment]);
    }

    #[test]
    fn test_report_serializes_sections() {
        let report = SaveReport::new(vec![SectionOutcome {
            section: SettingsSection::Delivery,
            ok: true,
            error: None,
        }]);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["sections"][0]["section"], "delivery");
        assert!(value["sections"][0].get("error").is_none());
    }

    #[test]
    fn test_form_binds_typed_fields() {
        let fields = vec![
            pair("store.name", "Yến Flowers"),
            pair("delivery.default_fee", "35000"),
            pair("delivery.express_enabled", "on"),
            pair("payment.paypal_enabled", "on"),
            pair("unknown.field", "x"),
        ];
        let settings = settings_from_form(&fields).unwrap();

        assert_eq!(settings.store.name, "Yến Flowers");
        assert_eq!(settings.delivery.default_fee, 35_000);
        assert!(settings.delivery.express_enabled);
        assert!(settings.payment.paypal_enabled);
        // Unchecked checkboxes are false even when the default is true
        assert!(!settings.payment.cod_enabled);
        // Untouched numbers keep their defaults
        assert_eq!(settings.delivery.free_shipping_threshold, 1_000_000);
    }

    #[test]
    fn test_form_rejects_bad_number() {
        let err = settings_from_form(&[pair("notification.low_stock_threshold", "năm")]).unwrap_err();
        assert_eq!(err, FormError("notification.low_stock_threshold".to_string()));
    }

    #[test]
    fn test_section_list_display() {
        let list = [SettingsSection::Store, SettingsSection::Payment];
        assert_eq!(SectionList(&list).to_string(), "store, payment");
    }
}
