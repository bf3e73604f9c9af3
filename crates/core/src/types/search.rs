//! Smart search payloads.
//!
//! The backend parses free-text queries (Vietnamese or English) into a
//! [`SearchIntent`]. The storefront only displays it: every field is optional
//! and nothing here validates or re-derives intent.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// Fields the backend extracted from a search query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIntent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flower_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

/// A labelled value rendered as a chip above search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentChip {
    pub label: &'static str,
    pub value: String,
}

impl IntentChip {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

impl SearchIntent {
    /// Whether the backend extracted nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Chips for every present field, in display order.
    ///
    /// Absent fields produce no chip.
    #[must_use]
    pub fn chips(&self) -> Vec<IntentChip> {
        let mut chips = Vec::new();

        if let Some(occasion) = &self.occasion {
            chips.push(IntentChip::new("Dịp", humanize(occasion)));
        }
        match (self.price_min, self.price_max) {
            (Some(min), Some(max)) => chips.push(IntentChip::new(
                "Giá",
                format!("{} - {}", min.display(), max.display()),
            )),
            (None, Some(max)) => chips.push(IntentChip::new("Giá", format!("≤ {}", max.display()))),
            (Some(min), None) => chips.push(IntentChip::new("Giá", format!("≥ {}", min.display()))),
            (None, None) => {}
        }
        if let Some(flower) = &self.flower_type {
            chips.push(IntentChip::new("Loại hoa", humanize(flower)));
        }
        if let Some(color) = &self.color {
            chips.push(IntentChip::new("Màu", humanize(color)));
        }
        if let Some(district) = &self.district {
            chips.push(IntentChip::new("Khu vực", humanize(district)));
        }
        if self.urgent == Some(true) {
            chips.push(IntentChip::new("Giao", "gấp"));
        }
        if let Some(quality) = &self.quality {
            chips.push(IntentChip::new("Phân khúc", humanize(quality)));
        }

        chips
    }
}

/// Turn a backend token like `district_1` or `grand_opening` into display text.
fn humanize(token: &str) -> String {
    token.replace('_', " ")
}

/// A product as returned inside search results.
///
/// Search selects a reduced column set, so descriptive fields are absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: ProductId,
    pub slug: String,
    pub name_vi: String,
    #[serde(default)]
    pub name_en: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub sale_price: Option<Price>,
    #[serde(default)]
    pub images: Vec<super::product::ProductImage>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub is_featured: bool,
}

/// Response of the smart search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub intent: SearchIntent,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub count: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_intent_deserializes() {
        let intent: SearchIntent = serde_json::from_value(serde_json::json!({
            "price_max": 500_000,
            "flower_type": "roses"
        }))
        .unwrap();
        assert_eq!(intent.price_max, Some(Price::from_vnd(500_000)));
        assert_eq!(intent.flower_type.as_deref(), Some("roses"));
        assert!(intent.occasion.is_none());
    }

    #[test]
    fn test_chips_only_for_present_fields() {
        let intent = SearchIntent {
            price_max: Some(Price::from_vnd(500_000)),
            flower_type: Some("roses".to_string()),
            ..SearchIntent::default()
        };
        let chips = intent.chips();
        assert_eq!(chips.len(), 2);
        assert_eq!(chips[0].label, "Giá");
        assert_eq!(chips[0].value, "≤ 500.000₫");
        assert_eq!(chips[1].value, "roses");
    }

    #[test]
    fn test_chips_empty_intent() {
        assert!(SearchIntent::default().chips().is_empty());
        assert!(SearchIntent::default().is_empty());
    }

    #[test]
    fn test_chips_price_range_and_district() {
        let intent = SearchIntent {
            price_min: Some(Price::from_vnd(300_000)),
            price_max: Some(Price::from_vnd(500_000)),
            district: Some("district_1".to_string()),
            urgent: Some(true),
            ..SearchIntent::default()
        };
        let values: Vec<String> = intent.chips().into_iter().map(|c| c.value).collect();
        assert_eq!(values, vec!["300.000₫ - 500.000₫", "district 1", "gấp"]);
    }

    #[test]
    fn test_search_response_tolerates_missing_fields() {
        let response: SearchResponse =
            serde_json::from_value(serde_json::json!({"success": true, "results": []})).unwrap();
        assert!(response.intent.is_empty());
        assert_eq!(response.count, 0);
    }
}
