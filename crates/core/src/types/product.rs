//! Catalog types: products, categories and paginated listings.
//!
//! These mirror the backend's JSON. The storefront treats them as immutable
//! snapshots; the backend is the only writer.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// Display language for localized fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Vi,
    En,
}

/// A product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

/// A published catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub slug: String,
    pub name_vi: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub short_description_vi: Option<String>,
    #[serde(default)]
    pub short_description_en: Option<String>,
    #[serde(default)]
    pub description_vi: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub sale_price: Option<Price>,
    /// Ordered as the backend returns them; `sort_order` is informational.
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_featured: bool,
}

impl Product {
    /// Name in the requested locale, falling back to Vietnamese.
    #[must_use]
    pub fn display_name(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => self.name_en.as_deref().unwrap_or(&self.name_vi),
            Locale::Vi => &self.name_vi,
        }
    }

    /// Short description in the requested locale, if any.
    #[must_use]
    pub fn short_description(&self, locale: Locale) -> Option<&str> {
        match locale {
            Locale::En => self
                .short_description_en
                .as_deref()
                .or(self.short_description_vi.as_deref()),
            Locale::Vi => self.short_description_vi.as_deref(),
        }
    }

    /// First image in display order.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images.first()
    }

    /// Whether a sale price below the list price is set.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.sale_price.is_some_and(|sale| sale < self.price)
    }

    /// The price a customer pays.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        match self.sale_price {
            Some(sale) if sale < self.price => sale,
            _ => self.price,
        }
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub slug: String,
    pub name_vi: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub description_vi: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size: 0,
            total_pages: 0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rose_bouquet() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "p-1",
            "slug": "bo-hoa-hong-do",
            "name_vi": "Bó hoa hồng đỏ",
            "name_en": "Red rose bouquet",
            "price": 550_000,
            "sale_price": 490_000,
            "images": [
                {"url": "https://cdn.example/1.jpg", "sort_order": 0},
                {"url": "https://cdn.example/2.jpg", "sort_order": 1}
            ],
            "is_published": true,
            "is_featured": true,
            "created_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_product_deserializes_backend_shape() {
        let product = rose_bouquet();
        assert_eq!(product.id.as_str(), "p-1");
        assert_eq!(product.images.len(), 2);
        assert!(product.category_id.is_none());
        assert!(product.tags.is_empty());
    }

    #[test]
    fn test_display_name_falls_back_to_vietnamese() {
        let mut product = rose_bouquet();
        assert_eq!(product.display_name(Locale::En), "Red rose bouquet");
        product.name_en = None;
        assert_eq!(product.display_name(Locale::En), "Bó hoa hồng đỏ");
    }

    #[test]
    fn test_effective_price_prefers_lower_sale_price() {
        let mut product = rose_bouquet();
        assert!(product.is_on_sale());
        assert_eq!(product.effective_price(), Price::from_vnd(490_000));

        // A "sale" above list price is ignored
        product.sale_price = Some(Price::from_vnd(600_000));
        assert!(!product.is_on_sale());
        assert_eq!(product.effective_price(), Price::from_vnd(550_000));
    }

    #[test]
    fn test_primary_image_is_first() {
        let product = rose_bouquet();
        assert_eq!(
            product.primary_image().map(|i| i.url.as_str()),
            Some("https://cdn.example/1.jpg")
        );
    }

    #[test]
    fn test_page_has_next() {
        let page: Page<Product> = Page {
            items: vec![],
            total: 30,
            page: 1,
            page_size: 12,
            total_pages: 3,
        };
        assert!(page.has_next());
        assert!(!Page::<Product>::default().has_next());
    }
}
