//! Storefront pages against a fake backend.

#![allow(clippy::unwrap_used)]

use axum::{
    Json, Router,
    body::Body,
    extract::Path,
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower::ServiceExt;

use yen_flowers_integration_tests::{FakeBackend, body_text, wait_for};

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn product(slug: &str) -> serde_json::Value {
    json!({
        "id": format!("id-{slug}"),
        "slug": slug,
        "name_vi": "Bó hoa tulip hồng",
        "price": 550000,
        "sale_price": 490000,
        "images": [
            {"url": "https://cdn.example/b.jpg", "sort_order": 1},
            {"url": "https://cdn.example/a.jpg", "sort_order": 0}
        ],
        "category_id": "cat-1",
        "is_published": true
    })
}

fn backend_routes() -> Router {
    Router::new()
        .route(
            "/products/featured",
            get(|| async { Json(json!([product("tulip-hong")])) }),
        )
        .route(
            "/products/{slug}",
            get(|Path(slug): Path<String>| async move {
                if slug == "tulip-hong" {
                    Json(product(&slug)).into_response()
                } else {
                    (StatusCode::NOT_FOUND, Json(json!({"detail": "Product not found"})))
                        .into_response()
                }
            }),
        )
        .route("/ai/track", post(|| async { Json(json!({"success": true})) }))
}

#[tokio::test]
async fn test_health() {
    let backend = FakeBackend::start(Router::new()).await;
    let response = backend.storefront().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_product_page_renders_and_tracks_view() {
    let backend = FakeBackend::start(backend_routes()).await;

    let response = backend
        .storefront()
        .oneshot(get_request("/products/tulip-hong"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Bó hoa tulip hồng"));
    assert!(body.contains("490.000₫"));
    assert!(body.contains("/recommendations?context=pdp&#38;product_id=id-tulip-hong"));

    let view = wait_for(&backend.log, "/ai/track").await.unwrap().json();
    assert_eq!(view["event_type"], "view");
    assert_eq!(view["product_id"], "id-tulip-hong");
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let backend = FakeBackend::start(backend_routes()).await;

    let response = backend
        .storefront()
        .oneshot(get_request("/products/khong-ton-tai"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_backend_outage_is_bad_gateway_for_product_page() {
    let backend = FakeBackend::start(Router::new().route(
        "/products/{slug}",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    ))
    .await;

    let response = backend
        .storefront()
        .oneshot(get_request("/products/tulip-hong"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_home_degrades_when_social_feed_fails() {
    let backend = FakeBackend::start(backend_routes()).await;

    let response = backend.storefront().oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Bó hoa tulip hồng"));
    assert!(body.contains("/recommendations?context=homepage"));
}
