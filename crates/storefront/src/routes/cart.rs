//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Adding a product re-reads it from
//! the backend so the stored name and price are authoritative.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use yen_flowers_core::{
    CartItem, InteractionEvent, InteractionKind, ProductId, RecommendationContext, cart_item_count,
    cart_subtotal,
};

use super::recommendations::RecommendationSlot;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{cart_items, session_id, set_cart_items};
use crate::state::AppState;
use crate::widgets::RecommendationRequest;

/// Largest quantity of one product per cart line.
const MAX_LINE_QUANTITY: u32 = 99;

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub variant: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image_url: Option<String>,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            variant: item.variant.clone(),
            quantity: item.quantity,
            price: item.unit_price.display(),
            line_price: item.line_total().display(),
            image_url: item.image_url.clone(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&[CartItem]> for CartView {
    fn from(items: &[CartItem]) -> Self {
        Self {
            items: items.iter().map(CartItemView::from).collect(),
            subtotal: cart_subtotal(items).display(),
            item_count: cart_item_count(items),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub slug: String,
    pub quantity: Option<u32>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/cart.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub recommendations: RecommendationSlot,
}

/// Quantity submitted by the add form, within `1..=MAX_LINE_QUANTITY`.
#[must_use]
pub fn requested_quantity(submitted: Option<u32>) -> u32 {
    submitted.unwrap_or(1).clamp(1, MAX_LINE_QUANTITY)
}

/// Put `quantity` of a product into `items`, merging with an existing line.
pub fn add_line(items: &mut Vec<CartItem>, item: CartItem) {
    if let Some(existing) = items.iter_mut().find(|line| line.id == item.id) {
        existing.quantity = existing
            .quantity
            .saturating_add(item.quantity)
            .min(MAX_LINE_QUANTITY);
    } else {
        items.push(CartItem {
            quantity: item.quantity.min(MAX_LINE_QUANTITY),
            ..item
        });
    }
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let items = cart_items(&session).await;

    CartShowTemplate {
        cart: CartView::from(items.as_slice()),
        recommendations: RecommendationSlot::from(&RecommendationRequest::new(
            RecommendationContext::Cart,
        )),
    }
}

/// Add a product to the cart, then show the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let product = state
        .api()
        .product_by_slug(&form.slug)
        .await
        .map_err(|e| AppError::from_api(e, format!("product {}", form.slug)))?;

    let mut items = cart_items(&session).await;
    add_line(
        &mut items,
        CartItem {
            id: product.id.clone(),
            name: product.name_vi.clone(),
            variant: None,
            unit_price: product.effective_price(),
            quantity: requested_quantity(form.quantity),
            image_url: product.primary_image().map(|img| img.url.clone()),
        },
    );
    set_cart_items(&session, &items)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to save cart: {e}")))?;

    super::spawn_tracking(
        state.api(),
        InteractionEvent {
            session_id: session_id(&session).await,
            event_type: InteractionKind::AddToCart,
            product_id: Some(product.id),
            category_id: product.category_id,
        },
    );

    Ok(Redirect::to("/cart"))
}

/// Remove a line from the cart, then show the cart.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Redirect> {
    let id = ProductId::new(form.product_id);
    let mut items = cart_items(&session).await;
    items.retain(|line| line.id != id);

    set_cart_items(&session, &items)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to save cart: {e}")))?;

    Ok(Redirect::to("/cart"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use yen_flowers_core::Price;

    use super::*;

    fn line(id: &str, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: format!("Hoa {id}"),
            variant: None,
            unit_price: Price::from_vnd(250_000),
            quantity,
            image_url: None,
        }
    }

    #[test]
    fn test_add_line_merges_same_product() {
        let mut items = vec![line("a", 1)];
        add_line(&mut items, line("a", 2));
        add_line(&mut items, line("b", 1));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quantity, 3);
    }

    #[test]
    fn test_add_line_caps_quantity() {
        let mut items = vec![line("a", 98)];
        add_line(&mut items, line("a", 5));
        assert_eq!(items[0].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_add_line_saturates_huge_quantity() {
        let mut items = vec![line("a", MAX_LINE_QUANTITY)];
        add_line(&mut items, line("a", u32::MAX));
        add_line(&mut items, line("b", u32::MAX));
        assert_eq!(items[0].quantity, MAX_LINE_QUANTITY);
        assert_eq!(items[1].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_requested_quantity_bounds() {
        assert_eq!(requested_quantity(None), 1);
        assert_eq!(requested_quantity(Some(0)), 1);
        assert_eq!(requested_quantity(Some(7)), 7);
        assert_eq!(requested_quantity(Some(u32::MAX)), MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_cart_view_totals() {
        let items = vec![line("a", 2), line("b", 1)];
        let view = CartView::from(items.as_slice());
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, "750.000₫");
        assert_eq!(view.items[0].line_price, "500.000₫");
    }
}
