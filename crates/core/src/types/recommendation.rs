//! Recommendation and interaction-tracking payloads.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::id::{CategoryId, ProductId, SessionId};
use super::price::Price;

/// Where a recommendation list is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RecommendationContext {
    #[default]
    #[serde(rename = "homepage")]
    Homepage,
    #[serde(rename = "pdp")]
    ProductDetail,
    #[serde(rename = "cart")]
    Cart,
}

impl RecommendationContext {
    /// Every context, in display order.
    pub const ALL: [Self; 3] = [Self::Homepage, Self::ProductDetail, Self::Cart];

    /// Wire name used by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Homepage => "homepage",
            Self::ProductDetail => "pdp",
            Self::Cart => "cart",
        }
    }
}

impl fmt::Display for RecommendationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown recommendation context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown recommendation context: {0}")]
pub struct ParseContextError(pub String);

impl FromStr for RecommendationContext {
    type Err = ParseContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "homepage" | "home" => Ok(Self::Homepage),
            "pdp" | "product" | "product-detail" => Ok(Self::ProductDetail),
            "cart" => Ok(Self::Cart),
            other => Err(ParseContextError(other.to_string())),
        }
    }
}

/// A product in a ranked recommendation list.
///
/// The recommendation engine formats products differently from catalog reads:
/// the name is flattened and `images` may be bare URLs or image objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedProduct {
    pub id: ProductId,
    #[serde(default)]
    pub slug: Option<String>,
    pub name: String,
    #[serde(default)]
    pub name_en: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub sale_price: Option<Price>,
    #[serde(default, deserialize_with = "image_urls")]
    pub images: Vec<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl RecommendedProduct {
    /// First image URL.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// The price a customer pays.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        match self.sale_price {
            Some(sale) if sale < self.price => sale,
            _ => self.price,
        }
    }

    /// Path segment used to link to the product page.
    ///
    /// Falls back to the id when the engine did not include a slug.
    #[must_use]
    pub fn link_key(&self) -> &str {
        self.slug.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}

fn image_urls<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ImageEntry {
        Url(String),
        Object { url: String },
    }

    let entries: Option<Vec<ImageEntry>> = Option::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(|entry| match entry {
            ImageEntry::Url(url) | ImageEntry::Object { url } => url,
        })
        .collect())
}

/// A click on one card of a recommendation list.
///
/// Carries the full ordered list that was shown so the position is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationClick {
    pub session_id: SessionId,
    #[serde(rename = "recommended_products")]
    pub recommended_ids: Vec<ProductId>,
    #[serde(rename = "clicked_product_id")]
    pub clicked_id: ProductId,
    pub context: RecommendationContext,
    /// Zero-based index of the clicked card.
    pub position: usize,
    pub algorithm: String,
}

/// Kinds of interaction events the backend records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    View,
    AddToCart,
    RemoveFromCart,
    Purchase,
    Search,
}

/// A generic interaction event used to train recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub session_id: SessionId,
    pub event_type: InteractionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}
