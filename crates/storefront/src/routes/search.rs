//! Search route handlers.
//!
//! The backend parses intent out of the raw query; these handlers only send
//! the text and render what comes back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{instrument, warn};

use yen_flowers_core::IntentChip;

use super::products::ProductCardView;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::session_id;
use crate::state::AppState;
use crate::widgets::search_bar::{SUGGESTION_LIMIT, is_suggestible, search_url};

/// Results requested for the full search page.
pub const SEARCH_PAGE_LIMIT: u32 = 20;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// A suggestion row in the dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionView {
    pub text: String,
    pub href: String,
}

/// Search suggestions template (HTMX fragment).
#[derive(Template, WebTemplate)]
#[template(path = "partials/suggestions.html")]
pub struct SuggestionsTemplate {
    pub suggestions: Vec<SuggestionView>,
}

/// Full search page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/search.html")]
pub struct SearchPageTemplate {
    pub query: String,
    pub chips: Vec<IntentChip>,
    pub results: Vec<ProductCardView>,
    pub count: usize,
    pub searched: bool,
    pub failed: bool,
}

/// Search suggestions endpoint (HTMX).
///
/// Queries shorter than two characters never reach the backend; failures
/// render an empty dropdown.
#[instrument(skip(state))]
pub async fn suggest(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let prefix = query.q.trim();

    if !is_suggestible(prefix) {
        return SuggestionsTemplate {
            suggestions: Vec::new(),
        };
    }

    let suggestions = match state.api().suggestions(prefix, SUGGESTION_LIMIT).await {
        Ok(suggestions) => suggestions,
        Err(e) => {
            warn!(error = %e, prefix, "Suggestion request failed");
            Vec::new()
        }
    };

    SuggestionsTemplate {
        suggestions: suggestions
            .into_iter()
            .map(|text| SuggestionView {
                href: search_url(&text),
                text,
            })
            .collect(),
    }
}

/// Full search page.
///
/// A failed search renders a generic alert. Nothing is retried.
#[instrument(skip(state, session))]
pub async fn search_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    if query.q.trim().is_empty() {
        return SearchPageTemplate {
            query: String::new(),
            chips: Vec::new(),
            results: Vec::new(),
            count: 0,
            searched: false,
            failed: false,
        };
    }

    add_breadcrumb("search", "Submitted search", Some(&[("query", query.q.as_str())][..]));
    let session_id = session_id(&session).await;

    match state
        .api()
        .search(&query.q, &session_id, SEARCH_PAGE_LIMIT)
        .await
    {
        Ok(response) => SearchPageTemplate {
            chips: response.intent.chips(),
            results: response.results.iter().map(ProductCardView::from).collect(),
            count: response.count.max(response.results.len()),
            query: query.q,
            searched: true,
            failed: false,
        },
        Err(e) => {
            warn!(error = %e, "Search failed");
            SearchPageTemplate {
                query: query.q,
                chips: Vec::new(),
                results: Vec::new(),
                count: 0,
                searched: true,
                failed: true,
            }
        }
    }
}

/// Create the search routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_page))
        .route("/suggest", get(suggest))
}
