//! Recommendations widget.
//!
//! Renders a ranked product list for a page context. The widget never fails
//! the page it sits on: a failed call and an empty list both render nothing.

use url::form_urlencoded;

use yen_flowers_core::{ProductId, RecommendationClick, RecommendationContext, SessionId};

use crate::api::{ApiClient, ApiError, RecommendationList};

/// Cards requested when the caller does not specify a limit.
pub const DEFAULT_LIMIT: u32 = 8;

/// Largest limit the backend accepts.
pub const MAX_LIMIT: u32 = 50;

/// Parameters of one recommendation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRequest {
    pub context: RecommendationContext,
    pub product_id: Option<ProductId>,
    pub limit: u32,
}

impl RecommendationRequest {
    #[must_use]
    pub const fn new(context: RecommendationContext) -> Self {
        Self {
            context,
            product_id: None,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Anchor the list on a product (used on product pages).
    #[must_use]
    pub fn for_product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    /// Set the limit, clamped to `1..=MAX_LIMIT`.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = clamp_limit(limit);
        self
    }

    /// URL of the HTMX fragment that renders this list.
    #[must_use]
    pub fn fragment_url(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("context", self.context.as_str());
        if let Some(product_id) = &self.product_id {
            query.append_pair("product_id", product_id.as_str());
        }
        query.append_pair("limit", &self.limit.to_string());
        format!("/recommendations?{}", query.finish())
    }
}

/// Clamp a requested card count to what the backend accepts.
#[must_use]
pub const fn clamp_limit(limit: u32) -> u32 {
    if limit == 0 {
        1
    } else if limit > MAX_LIMIT {
        MAX_LIMIT
    } else {
        limit
    }
}

/// Lifecycle of the widget.
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationsState {
    /// Request in flight; only a placeholder is shown.
    Loading,
    /// Failed or returned nothing; renders no markup.
    Empty,
    /// At least one product to show.
    Populated(RecommendationList),
}

/// One rendered product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationCard {
    pub position: usize,
    pub product_id: ProductId,
    pub name: String,
    pub image_url: Option<String>,
    pub price: String,
    /// Crossed-out list price when the product is on sale.
    pub original_price: Option<String>,
    /// Link that records the click and then opens the product page.
    pub href: String,
}

/// A recommendation list bound to the context it was fetched for.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationsWidget {
    context: RecommendationContext,
    state: RecommendationsState,
}

impl RecommendationsWidget {
    /// Widget that has not received a response yet.
    #[must_use]
    pub const fn loading(context: RecommendationContext) -> Self {
        Self {
            context,
            state: RecommendationsState::Loading,
        }
    }

    /// Build from a backend response.
    ///
    /// Errors are logged and, like an empty list, collapse to
    /// [`RecommendationsState::Empty`].
    #[must_use]
    pub fn from_result(
        context: RecommendationContext,
        result: Result<RecommendationList, ApiError>,
    ) -> Self {
        let state = match result {
            Ok(list) if !list.items.is_empty() => RecommendationsState::Populated(list),
            Ok(_) => RecommendationsState::Empty,
            Err(e) => {
                tracing::warn!(error = %e, %context, "Recommendations unavailable");
                RecommendationsState::Empty
            }
        };
        Self { context, state }
    }

    /// Fetch and build the widget for `request`.
    pub async fn load(client: &ApiClient, request: &RecommendationRequest) -> Self {
        let result = client
            .recommendations(request.context, request.product_id.as_ref(), request.limit)
            .await;
        Self::from_result(request.context, result)
    }

    #[must_use]
    pub const fn context(&self) -> RecommendationContext {
        self.context
    }

    #[must_use]
    pub const fn state(&self) -> &RecommendationsState {
        &self.state
    }

    /// Whether nothing should be rendered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.state, RecommendationsState::Empty)
    }

    fn list(&self) -> Option<&RecommendationList> {
        match &self.state {
            RecommendationsState::Populated(list) => Some(list),
            _ => None,
        }
    }

    /// Ordered ids of every product shown.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.list()
            .map(|list| list.items.iter().map(|item| item.id.clone()).collect())
            .unwrap_or_default()
    }

    /// Cards in ranked order, each linking through the click tracker.
    #[must_use]
    pub fn cards(&self) -> Vec<RecommendationCard> {
        let Some(list) = self.list() else {
            return Vec::new();
        };
        let ids = join_ids(&self.product_ids());

        list.items
            .iter()
            .enumerate()
            .map(|(position, item)| {
                let price = item.effective_price();
                let mut query = form_urlencoded::Serializer::new(String::new());
                query
                    .append_pair("context", self.context.as_str())
                    .append_pair("position", &position.to_string())
                    .append_pair("ids", &ids)
                    .append_pair("clicked", item.id.as_str())
                    .append_pair("algorithm", &list.algorithm)
                    .append_pair("slug", item.link_key());

                RecommendationCard {
                    position,
                    product_id: item.id.clone(),
                    name: item.name.clone(),
                    image_url: item.primary_image().map(str::to_string),
                    price: price.display(),
                    original_price: (price < item.price).then(|| item.price.display()),
                    href: format!("/recommendations/click?{}", query.finish()),
                }
            })
            .collect()
    }

    /// Tracking payload for a click on the card at `position`.
    ///
    /// Returns `None` when no card sits at that position.
    #[must_use]
    pub fn click_event(&self, session_id: SessionId, position: usize) -> Option<RecommendationClick> {
        let list = self.list()?;
        let clicked = list.items.get(position)?;

        Some(RecommendationClick {
            session_id,
            recommended_ids: self.product_ids(),
            clicked_id: clicked.id.clone(),
            context: self.context,
            position,
            algorithm: list.algorithm.clone(),
        })
    }
}

/// Comma-joined id list carried on click links.
#[must_use]
pub fn join_ids(ids: &[ProductId]) -> String {
    ids.iter()
        .map(ProductId::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Inverse of [`join_ids`]; blank entries are dropped.
#[must_use]
pub fn split_ids(raw: &str) -> Vec<ProductId> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ProductId::new)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use yen_flowers_core::{Price, RecommendedProduct};

    use super::*;

    fn item(id: &str, price: i64, sale: Option<i64>) -> RecommendedProduct {
        RecommendedProduct {
            id: ProductId::new(id),
            slug: Some(format!("slug-{id}")),
            name: format!("Hoa {id}"),
            name_en: None,
            price: Price::from_vnd(price),
            sale_price: sale.map(Price::from_vnd),
            images: vec![format!("https://cdn.example/{id}.jpg")],
            category_id: None,
            confidence: Some(0.5),
        }
    }

    fn cart_widget(count: usize) -> RecommendationsWidget {
        let items = (0..count)
            .map(|i| item(&format!("p{i}"), 300_000, None))
            .collect();
        RecommendationsWidget::from_result(
            RecommendationContext::Cart,
            Ok(RecommendationList {
                items,
                algorithm: "hybrid".to_string(),
            }),
        )
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(8), 8);
        assert_eq!(clamp_limit(500), MAX_LIMIT);
        let request = RecommendationRequest::new(RecommendationContext::Homepage).with_limit(99);
        assert_eq!(request.limit, 50);
    }

    #[test]
    fn test_fragment_url() {
        let request = RecommendationRequest::new(RecommendationContext::ProductDetail)
            .for_product(ProductId::new("p 1"))
            .with_limit(4);
        assert_eq!(
            request.fragment_url(),
            "/recommendations?context=pdp&product_id=p+1&limit=4"
        );
    }

    #[test]
    fn test_error_collapses_to_empty() {
        let widget = RecommendationsWidget::from_result(
            RecommendationContext::Homepage,
            Err(ApiError::NotFound("/ai/recommendations".to_string())),
        );
        assert!(widget.is_empty());
        assert!(widget.cards().is_empty());
        assert!(widget.click_event(SessionId::new("s"), 0).is_none());
    }

    #[test]
    fn test_zero_items_is_empty() {
        let widget = cart_widget(0);
        assert_eq!(widget.state(), &RecommendationsState::Empty);
    }

    #[test]
    fn test_loading_renders_no_cards() {
        let widget = RecommendationsWidget::loading(RecommendationContext::Cart);
        assert!(!widget.is_empty());
        assert!(widget.cards().is_empty());
    }

    #[test]
    fn test_click_on_third_of_five_cart_items() {
        let widget = cart_widget(5);
        let click = widget.click_event(SessionId::new("sess"), 2).unwrap();

        assert_eq!(
            click.recommended_ids,
            vec![
                ProductId::new("p0"),
                ProductId::new("p1"),
                ProductId::new("p2"),
                ProductId::new("p3"),
                ProductId::new("p4"),
            ]
        );
        assert_eq!(click.clicked_id, ProductId::new("p2"));
        assert_eq!(click.context, RecommendationContext::Cart);
        assert_eq!(click.position, 2);
    }

    #[test]
    fn test_click_out_of_range() {
        assert!(cart_widget(5).click_event(SessionId::new("sess"), 5).is_none());
    }

    #[test]
    fn test_cards_link_through_tracker() {
        let widget = cart_widget(3);
        let cards = widget.cards();

        assert_eq!(cards.len(), 3);
        assert_eq!(cards[1].position, 1);
        assert_eq!(
            cards[1].href,
            "/recommendations/click?context=cart&position=1&ids=p0%2Cp1%2Cp2&clicked=p1&algorithm=hybrid&slug=slug-p1"
        );
    }

    #[test]
    fn test_card_shows_sale_price() {
        let widget = RecommendationsWidget::from_result(
            RecommendationContext::Homepage,
            Ok(RecommendationList {
                items: vec![item("a", 500_000, Some(450_000))],
                algorithm: "hybrid".to_string(),
            }),
        );
        let card = &widget.cards()[0];
        assert_eq!(card.price, "450.000₫");
        assert_eq!(card.original_price.as_deref(), Some("500.000₫"));
    }

    #[test]
    fn test_split_ids_round_trip() {
        let ids = vec![ProductId::new("a"), ProductId::new("b")];
        assert_eq!(split_ids(&join_ids(&ids)), ids);
        assert!(split_ids(" , ").is_empty());
    }
}
