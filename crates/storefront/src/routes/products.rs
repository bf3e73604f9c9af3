//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use yen_flowers_core::{
    InteractionEvent, InteractionKind, Locale, Product, RecommendationContext, SearchResult,
};

use super::recommendations::RecommendationSlot;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::session_id;
use crate::state::AppState;
use crate::widgets::RecommendationRequest;

/// Product card display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCardView {
    pub href: String,
    pub name: String,
    pub image_url: Option<String>,
    pub image_alt: String,
    pub price: String,
    pub original_price: Option<String>,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        let image = product.primary_image();
        Self {
            href: product_href(&product.slug),
            name: product.display_name(Locale::Vi).to_string(),
            image_url: image.map(|img| img.url.clone()),
            image_alt: image
                .and_then(|img| img.alt.clone())
                .unwrap_or_else(|| product.name_vi.clone()),
            price: product.effective_price().display(),
            original_price: product.is_on_sale().then(|| product.price.display()),
        }
    }
}

impl From<&SearchResult> for ProductCardView {
    fn from(result: &SearchResult) -> Self {
        let image = result.images.first();
        let effective = match result.sale_price {
            Some(sale) if sale < result.price => sale,
            _ => result.price,
        };
        Self {
            href: product_href(&result.slug),
            name: result.name_vi.clone(),
            image_url: image.map(|img| img.url.clone()),
            image_alt: image
                .and_then(|img| img.alt.clone())
                .unwrap_or_else(|| result.name_vi.clone()),
            price: effective.display(),
            original_price: (effective < result.price).then(|| result.price.display()),
        }
    }
}

/// Product page URL.
#[must_use]
pub fn product_href(slug: &str) -> String {
    format!("/products/{}", urlencoding::encode(slug))
}

/// Image display data for templates.
#[derive(Debug, Clone)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
}

/// Product detail display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub slug: String,
    pub name: String,
    pub name_en: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub price: String,
    pub original_price: Option<String>,
    pub images: Vec<ImageView>,
    pub tags: Vec<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let mut images = product.images.clone();
        images.sort_by_key(|img| img.sort_order);

        Self {
            slug: product.slug.clone(),
            name: product.name_vi.clone(),
            name_en: product.name_en.clone(),
            short_description: product.short_description(Locale::Vi).map(str::to_string),
            description: product.description_vi.clone(),
            price: product.effective_price().display(),
            original_price: product.is_on_sale().then(|| product.price.display()),
            images: images
                .into_iter()
                .map(|img| ImageView {
                    alt: img.alt.unwrap_or_else(|| product.name_vi.clone()),
                    url: img.url,
                })
                .collect(),
            tags: product.tags.clone(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/product.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub recommendations: RecommendationSlot,
}

/// Display product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let product = state
        .api()
        .product_by_slug(&slug)
        .await
        .map_err(|e| AppError::from_api(e, format!("product {slug}")))?;

    super::spawn_tracking(
        state.api(),
        InteractionEvent {
            session_id: session_id(&session).await,
            event_type: InteractionKind::View,
            product_id: Some(product.id.clone()),
            category_id: product.category_id.clone(),
        },
    );

    let request =
        RecommendationRequest::new(RecommendationContext::ProductDetail).for_product(product.id.clone());

    Ok(ProductShowTemplate {
        product: ProductView::from(&product),
        recommendations: RecommendationSlot::from(&request),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use yen_flowers_core::{Price, ProductId, ProductImage};

    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new("p-1"),
            slug: "bo-hoa-hong-do".to_string(),
            name_vi: "Bó hoa hồng đỏ".to_string(),
            name_en: Some("Red rose bouquet".to_string()),
            short_description_vi: None,
            short_description_en: None,
            description_vi: None,
            price: Price::from_vnd(500_000),
            sale_price: Some(Price::from_vnd(450_000)),
            images: vec![
                ProductImage {
                    url: "https://cdn.example/2.jpg".to_string(),
                    alt: None,
                    sort_order: 2,
                },
                ProductImage {
                    url: "https://cdn.example/1.jpg".to_string(),
                    alt: Some("Hoa hồng".to_string()),
                    sort_order: 1,
                },
            ],
            category_id: None,
            tags: vec!["roses".to_string()],
            is_published: true,
            is_featured: false,
        }
    }

    #[test]
    fn test_card_view_prices() {
        let card = ProductCardView::from(&product());
        assert_eq!(card.href, "/products/bo-hoa-hong-do");
        assert_eq!(card.price, "450.000₫");
        assert_eq!(card.original_price.as_deref(), Some("500.000₫"));
    }

    #[test]
    fn test_product_view_orders_images() {
        let view = ProductView::from(&product());
        assert_eq!(view.images[0].url, "https://cdn.example/1.jpg");
        assert_eq!(view.images[0].alt, "Hoa hồng");
        assert_eq!(view.images[1].alt, "Bó hoa hồng đỏ");
    }
}
