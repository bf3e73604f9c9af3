//! Recommendation command.

use std::fmt::Write as _;

use yen_flowers_core::{ProductId, RecommendationContext};
use yen_flowers_storefront::api::ApiClient;
use yen_flowers_storefront::widgets::{RecommendationRequest, RecommendationsWidget};

/// Fetch and print recommendations.
///
/// A failed call prints nothing, like the widget renders nothing.
pub async fn run(
    client: &ApiClient,
    context: RecommendationContext,
    product_id: Option<String>,
    limit: u32,
) {
    let mut request = RecommendationRequest::new(context).with_limit(limit);
    if let Some(id) = product_id {
        request = request.for_product(ProductId::new(id));
    }

    let widget = RecommendationsWidget::load(client, &request).await;

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(&widget));
    }
}

/// Text listing of the widget's cards; empty when there is nothing to show.
#[must_use]
pub fn render(widget: &RecommendationsWidget) -> String {
    let mut out = String::new();
    for card in widget.cards() {
        let _ = write!(out, "{:>3}. {} - {}", card.position + 1, card.name, card.price);
        if let Some(original) = &card.original_price {
            let _ = write!(out, " (giá gốc {original})");
        }
        let _ = writeln!(out, " [{}]", card.product_id);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use yen_flowers_storefront::api::{ApiError, RecommendationList};

    use super::*;

    fn list() -> RecommendationList {
        serde_json::from_value(serde_json::json!({
            "recommendations": [
                {"id": "a", "slug": "hong-do", "name": "Hoa hồng đỏ", "price": 450000, "sale_price": 400000},
                {"id": "b", "name": "Hoa ly", "price": 320000}
            ],
            "algorithm": "hybrid"
        }))
        .unwrap()
    }

    #[test]
    fn test_render_cards_in_rank_order() {
        let widget = RecommendationsWidget::from_result(RecommendationContext::Cart, Ok(list()));
        let text = render(&widget);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1. Hoa hồng đỏ - 400.000₫"));
        assert!(lines[0].contains("(giá gốc 450.000₫)"));
        assert!(lines[1].starts_with("  2. Hoa ly - 320.000₫"));
        assert!(lines[1].ends_with("[b]"));
    }

    #[test]
    fn test_render_failed_call_is_empty() {
        let widget = RecommendationsWidget::from_result(
            RecommendationContext::Homepage,
            Err(ApiError::NotFound("/ai/recommendations".to_string())),
        );
        assert_eq!(render(&widget), "");
    }
}
