//! Recommendation fragment handlers.
//!
//! Pages embed a [`RecommendationSlot`] placeholder that loads the cards with
//! HTMX once the page is shown. A failed or empty list answers with an empty
//! body, which removes the placeholder.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{instrument, warn};

use yen_flowers_core::{ProductId, RecommendationClick, RecommendationContext, SessionId};

use super::products::product_href;
use crate::middleware::session_id;
use crate::state::AppState;
use crate::widgets::recommendations::{DEFAULT_LIMIT, split_ids};
use crate::widgets::{RecommendationCard, RecommendationRequest, RecommendationsWidget};

/// Section heading for a context.
#[must_use]
pub const fn heading(context: RecommendationContext) -> &'static str {
    match context {
        RecommendationContext::Homepage => "Gợi ý cho bạn",
        RecommendationContext::ProductDetail => "Sản phẩm tương tự",
        RecommendationContext::Cart => "Có thể bạn cũng thích",
    }
}

/// Placeholder that fetches a recommendation list on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationSlot {
    pub url: String,
    pub heading: &'static str,
}

impl From<&RecommendationRequest> for RecommendationSlot {
    fn from(request: &RecommendationRequest) -> Self {
        Self {
            url: request.fragment_url(),
            heading: heading(request.context),
        }
    }
}

/// Recommendation fragment query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct RecommendationsQuery {
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Recommendation cards fragment template (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/recommendations.html")]
pub struct RecommendationsTemplate {
    pub heading: &'static str,
    pub cards: Vec<RecommendationCard>,
}

/// Recommendation cards, or an empty body when there is nothing to show.
#[instrument(skip(state))]
pub async fn fragment(
    State(state): State<AppState>,
    Query(query): Query<RecommendationsQuery>,
) -> Response {
    let context = match query.context.parse::<RecommendationContext>() {
        Ok(context) => context,
        Err(e) => {
            warn!(error = %e, "Ignoring recommendations request");
            return Html("").into_response();
        }
    };

    let mut request =
        RecommendationRequest::new(context).with_limit(query.limit.unwrap_or(DEFAULT_LIMIT));
    if let Some(product_id) = query.product_id.filter(|id| !id.trim().is_empty()) {
        request = request.for_product(ProductId::new(product_id));
    }

    let widget = RecommendationsWidget::load(state.api(), &request).await;
    if widget.is_empty() {
        return Html("").into_response();
    }

    RecommendationsTemplate {
        heading: heading(context),
        cards: widget.cards(),
    }
    .into_response()
}

/// Click-through query parameters carried on every card link.
#[derive(Debug, Default, Deserialize)]
pub struct ClickQuery {
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub ids: String,
    #[serde(default)]
    pub clicked: String,
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default)]
    pub slug: String,
}

impl ClickQuery {
    /// Tracking payload, if the link is consistent.
    ///
    /// The clicked id must sit at `position` in the shown list.
    #[must_use]
    pub fn to_click(&self, session_id: SessionId) -> Option<RecommendationClick> {
        let context = self.context.parse().ok()?;
        let position = self.position.parse::<usize>().ok()?;
        let recommended_ids = split_ids(&self.ids);
        let clicked_id = ProductId::new(self.clicked.trim());

        if recommended_ids.get(position) != Some(&clicked_id) {
            return None;
        }

        Some(RecommendationClick {
            session_id,
            recommended_ids,
            clicked_id,
            context,
            position,
            algorithm: self
                .algorithm
                .clone()
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| "hybrid".to_string()),
        })
    }
}

/// Record a recommendation click, then open the product.
///
/// Tracking runs in the background; the redirect never waits for it.
#[instrument(skip(state, session))]
pub async fn click(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ClickQuery>,
) -> Redirect {
    match query.to_click(session_id(&session).await) {
        Some(event) => super::spawn_click_tracking(state.api(), event),
        None => warn!(?query, "Malformed recommendation click link"),
    }

    let target = query.slug.trim();
    if target.is_empty() {
        Redirect::to("/")
    } else {
        Redirect::to(&product_href(target))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn query(position: &str, clicked: &str) -> ClickQuery {
        ClickQuery {
            context: "cart".to_string(),
            position: position.to_string(),
            ids: "a,b,c,d,e".to_string(),
            clicked: clicked.to_string(),
            algorithm: None,
            slug: "hoa-c".to_string(),
        }
    }

    #[test]
    fn test_click_query_builds_event() {
        let click = query("2", "c").to_click(SessionId::new("s-1")).unwrap();
        assert_eq!(click.recommended_ids.len(), 5);
        assert_eq!(click.clicked_id, ProductId::new("c"));
        assert_eq!(click.position, 2);
        assert_eq!(click.context, RecommendationContext::Cart);
        assert_eq!(click.algorithm, "hybrid");
    }

    #[test]
    fn test_click_query_rejects_mismatched_position() {
        assert!(query("1", "c").to_click(SessionId::new("s")).is_none());
        assert!(query("9", "c").to_click(SessionId::new("s")).is_none());
        assert!(query("x", "c").to_click(SessionId::new("s")).is_none());
    }

    #[test]
    fn test_slot_from_request() {
        let slot = RecommendationSlot::from(&RecommendationRequest::new(RecommendationContext::Cart));
        assert_eq!(slot.url, "/recommendations?context=cart&limit=8");
        assert_eq!(slot.heading, "Có thể bạn cũng thích");
    }
}
