//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health          - Health check
//! GET  /                - Redirect to the settings form
//!
//! # Settings
//! GET  /settings        - Settings form
//! POST /settings        - Save the settings form
//! GET  /api/settings    - Current settings (JSON)
//! PUT  /api/settings    - Update sections (JSON), returns a save report
//! ```

pub mod settings;

use axum::{Router, response::Redirect, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/settings") }))
        .route("/health", get(health))
        .route("/settings", get(settings::show).post(settings::save))
        .route(
            "/api/settings",
            get(settings::api_get).put(settings::api_put),
        )
}

/// The admin application with its trace layer.
pub fn build_router(state: AppState) -> Router {
    routes()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
