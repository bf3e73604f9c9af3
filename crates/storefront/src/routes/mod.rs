//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /products/{slug}        - Product detail (records a view event)
//! GET  /categories/{slug}      - Category listing (paginated)
//!
//! # Search
//! GET  /search?q=              - Smart search results with intent chips
//! GET  /search/suggest?q=      - Suggestions dropdown fragment (HTMX)
//!
//! # Recommendations (HTMX fragments)
//! GET  /recommendations        - Recommendation cards, or an empty body
//! GET  /recommendations/click  - Record a card click, then redirect to the product
//!
//! # Cart (session only)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add a product
//! POST /cart/remove            - Remove a line
//! ```

pub mod cart;
pub mod categories;
pub mod home;
pub mod products;
pub mod recommendations;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use yen_flowers_core::{InteractionEvent, RecommendationClick};

use crate::api::ApiClient;
use crate::middleware;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
}

/// Create the recommendation fragment routes router.
pub fn recommendation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(recommendations::fragment))
        .route("/click", get(recommendations::click))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .route("/products/{slug}", get(products::show))
        .route("/categories/{slug}", get(categories::show))
        .nest("/search", search::router())
        .nest("/recommendations", recommendation_routes())
        .nest("/cart", cart_routes())
}

/// The storefront application with its session, request ID and trace layers.
pub fn build_router(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    routes()
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}

/// Record an interaction event without waiting for the backend.
pub(crate) fn spawn_tracking(api: &ApiClient, event: InteractionEvent) {
    let api = api.clone();
    tokio::spawn(async move {
        if let Err(e) = api.track_event(&event).await {
            warn!(error = %e, event = ?event.event_type, "Failed to record interaction");
        }
    });
}

/// Record a recommendation click without waiting for the backend.
pub(crate) fn spawn_click_tracking(api: &ApiClient, click: RecommendationClick) {
    let api = api.clone();
    tokio::spawn(async move {
        if let Err(e) = api.track_click(&click).await {
            warn!(error = %e, context = %click.context, "Failed to record recommendation click");
        }
    });
}
