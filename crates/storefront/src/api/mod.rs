//! Shop backend REST API client.
//!
//! # Architecture
//!
//! - The backend is the source of truth - no local persistence, direct API calls
//! - Catalog reads are cached in-memory via `moka` (5 minute TTL)
//! - Concurrent identical reads share one in-flight request
//! - Search, recommendations and tracking writes are never cached
//! - Nothing is retried; every failure is returned to the caller
//!
//! # Example
//!
//! ```rust,ignore
//! use yen_flowers_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.backend)?;
//!
//! let featured = client.featured_products(8).await?;
//! let results = client.search("hoa hồng đỏ giá 500k", &session_id, 20).await?;
//! ```

mod cache;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use yen_flowers_core::{
    Category, InteractionEvent, Page, Product, ProductId, RecommendationClick,
    RecommendationContext, RecommendedProduct, SearchResponse, SessionId, SocialPost,
};

use crate::config::BackendConfig;
use crate::widgets::search_bar::SuggestionSource;

pub use cache::{CacheKey, CacheValue};

/// Longest response body excerpt written to logs.
const LOG_BODY_LIMIT: usize = 500;

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A cached read failed; the error is shared by every waiter.
    #[error(transparent)]
    Shared(#[from] Arc<ApiError>),

    /// The cache held a value of the wrong kind for its key.
    #[error("Unexpected cached value for {0}")]
    CacheMismatch(String),
}

impl ApiError {
    /// Whether this error means the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Shared(inner) => inner.is_not_found(),
            _ => false,
        }
    }
}

/// A ranked recommendation list and the algorithm that produced it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecommendationList {
    #[serde(default, rename = "recommendations")]
    pub items: Vec<RecommendedProduct>,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

fn default_algorithm() -> String {
    "hybrid".to_string()
}

#[derive(Debug, Deserialize)]
struct SuggestionsEnvelope {
    #[serde(default)]
    suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    session_id: &'a SessionId,
    limit: u32,
}

#[derive(Debug, Serialize)]
struct RecommendationRequestBody<'a> {
    context: RecommendationContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_id: Option<&'a ProductId>,
    limit: u32,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the shop backend API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new backend API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Issue a GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .get(self.endpoint(path))
            .query(query)
            .send()
            .await?;

        decode(path, response).await
    }

    /// Issue a POST with a JSON body and decode the JSON response.
    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await?;

        decode(path, response).await
    }

    /// Serve from cache, or run `fetch` once for all concurrent callers.
    async fn cached<F>(&self, key: CacheKey, fetch: F) -> Result<CacheValue, ApiError>
    where
        F: Future<Output = Result<CacheValue, ApiError>>,
    {
        if self.inner.cache.contains_key(&key) {
            debug!(?key, "Cache hit");
        }
        self.inner
            .cache
            .try_get_with(key, fetch)
            .await
            .map_err(ApiError::Shared)
    }

    /// Drop every cached response.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    /// Featured products for the home page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn featured_products(&self, limit: u32) -> Result<Vec<Product>, ApiError> {
        let key = CacheKey::Featured { limit };
        let value = self
            .cached(key, async {
                let products = self
                    .get_json("/products/featured", &[("limit", limit.to_string())])
                    .await?;
                Ok(CacheValue::Products(products))
            })
            .await?;

        match value {
            CacheValue::Products(products) => Ok(products),
            _ => Err(ApiError::CacheMismatch("featured products".to_string())),
        }
    }

    /// A single published product by slug.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no published product has this slug.
    #[instrument(skip(self))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Product, ApiError> {
        let key = CacheKey::Product(slug.to_string());
        let path = format!("/products/{}", urlencoding::encode(slug));
        let value = self
            .cached(key, async {
                let product: Product = self.get_json(&path, &[]).await?;
                Ok(CacheValue::Product(Box::new(product)))
            })
            .await?;

        match value {
            CacheValue::Product(product) => Ok(*product),
            _ => Err(ApiError::CacheMismatch(format!("product {slug}"))),
        }
    }

    /// One page of published products in a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn products_by_category(
        &self,
        slug: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Product>, ApiError> {
        let key = CacheKey::CategoryProducts {
            slug: slug.to_string(),
            page,
            page_size,
        };
        let value = self
            .cached(key, async {
                let listing = self
                    .get_json(
                        "/products",
                        &[
                            ("category", slug.to_string()),
                            ("page", page.to_string()),
                            ("page_size", page_size.to_string()),
                        ],
                    )
                    .await?;
                Ok(CacheValue::ProductPage(listing))
            })
            .await?;

        match value {
            CacheValue::ProductPage(listing) => Ok(listing),
            _ => Err(ApiError::CacheMismatch(format!("category {slug}"))),
        }
    }

    /// All active categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let value = self
            .cached(CacheKey::Categories, async {
                let categories = self.get_json("/categories", &[]).await?;
                Ok(CacheValue::Categories(categories))
            })
            .await?;

        match value {
            CacheValue::Categories(categories) => Ok(categories),
            _ => Err(ApiError::CacheMismatch("categories".to_string())),
        }
    }

    /// One page of the social feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn social_feed(&self, page: u32, page_size: u32) -> Result<Vec<SocialPost>, ApiError> {
        let key = CacheKey::SocialFeed { page, page_size };
        let value = self
            .cached(key, async {
                let posts = self
                    .get_json(
                        "/social/feed",
                        &[("page", page.to_string()), ("page_size", page_size.to_string())],
                    )
                    .await?;
                Ok(CacheValue::SocialFeed(posts))
            })
            .await?;

        match value {
            CacheValue::SocialFeed(posts) => Ok(posts),
            _ => Err(ApiError::CacheMismatch("social feed".to_string())),
        }
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// Autocomplete suggestions for a query prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn suggestions(&self, prefix: &str, limit: u32) -> Result<Vec<String>, ApiError> {
        let key = CacheKey::Suggestions {
            prefix: prefix.to_string(),
            limit,
        };
        let value = self
            .cached(key, async {
                let envelope: SuggestionsEnvelope = self
                    .get_json(
                        "/ai/search/suggestions",
                        &[("q", prefix.to_string()), ("limit", limit.to_string())],
                    )
                    .await?;
                Ok(CacheValue::Suggestions(envelope.suggestions))
            })
            .await?;

        match value {
            CacheValue::Suggestions(suggestions) => Ok(suggestions),
            _ => Err(ApiError::CacheMismatch("suggestions".to_string())),
        }
    }

    /// Smart search: the backend parses intent from the literal query text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        session_id: &SessionId,
        limit: u32,
    ) -> Result<SearchResponse, ApiError> {
        let body = SearchRequest {
            query,
            session_id,
            limit,
        };
        self.post_json("/ai/search", &body).await
    }

    // -------------------------------------------------------------------------
    // Recommendations & Tracking
    // -------------------------------------------------------------------------

    /// Ranked recommendations for a page context.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn recommendations(
        &self,
        context: RecommendationContext,
        product_id: Option<&ProductId>,
        limit: u32,
    ) -> Result<RecommendationList, ApiError> {
        let body = RecommendationRequestBody {
            context,
            product_id,
            limit,
        };
        self.post_json("/ai/recommendations", &body).await
    }

    /// Record a click on a recommended product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(context = %click.context, position = click.position))]
    pub async fn track_click(&self, click: &RecommendationClick) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .post_json("/ai/recommendations/track-click", click)
            .await?;
        Ok(())
    }

    /// Record a generic interaction event (view, add to cart).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn track_event(&self, event: &InteractionEvent) -> Result<(), ApiError> {
        let _: serde_json::Value = self.post_json("/ai/track", event).await?;
        Ok(())
    }
}

impl SuggestionSource for ApiClient {
    async fn suggestions(&self, prefix: &str, limit: u32) -> Result<Vec<String>, ApiError> {
        Self::suggestions(self, prefix, limit).await
    }
}

/// Check the status and decode a JSON body, logging failures.
async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();

    // Get response body as text first for better error diagnostics
    let response_text = response.text().await?;

    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(path.to_string()));
    }

    if !status.is_success() {
        tracing::error!(
            status = %status,
            path,
            body = %excerpt(&response_text),
            "Backend returned non-success status"
        );
        return Err(ApiError::Status {
            status,
            body: excerpt(&response_text),
        });
    }

    serde_json::from_str(&response_text).map_err(|e| {
        tracing::error!(
            error = %e,
            path,
            body = %excerpt(&response_text),
            "Failed to parse backend response"
        );
        ApiError::Parse(e)
    })
}

fn excerpt(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::extract::{Path, Query};
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use super::*;
    use crate::config::parse_api_url;

    /// Serve `router` on an ephemeral port and return a client pointed at it.
    async fn client_for(router: Router) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        let url = parse_api_url(&format!("http://{addr}/api/v1")).unwrap();
        ApiClient::new(&BackendConfig::new(url)).unwrap()
    }

    fn product_json(slug: &str) -> Value {
        json!({
            "id": format!("id-{slug}"),
            "slug": slug,
            "name_vi": "Hoa hướng dương",
            "price": 350_000,
            "images": [],
            "is_published": true,
            "is_featured": true
        })
    }

    #[test]
    fn test_api_error_not_found_through_shared() {
        let err = ApiError::Shared(Arc::new(ApiError::NotFound("/products/x".to_string())));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: /products/x");
    }

    #[tokio::test]
    async fn test_featured_products_cached() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/api/v1/products/featured",
            get(move |Query(q): Query<std::collections::HashMap<String, String>>| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(q.get("limit").map(String::as_str), Some("4"));
                    Json(json!([product_json("huong-duong")]))
                }
            }),
        );
        let client = client_for(router).await;

        let first = client.featured_products(4).await.unwrap();
        let second = client.featured_products(4).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_reads_share_one_request() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/api/v1/categories",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Json(json!([{"id": "c1", "slug": "sinh-nhat", "name_vi": "Sinh nhật"}]))
                }
            }),
        );
        let client = client_for(router).await;

        let (a, b, c) = tokio::join!(client.categories(), client.categories(), client.categories());
        assert_eq!(a.unwrap().len(), 1);
        assert!(b.is_ok() && c.is_ok());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_product_not_found() {
        let router = Router::new().route(
            "/api/v1/products/{slug}",
            get(|Path(_slug): Path<String>| async {
                (AxumStatus::NOT_FOUND, Json(json!({"detail": "Product not found"})))
            }),
        );
        let client = client_for(router).await;

        let err = client.product_by_slug("khong-co").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_server_error_maps_to_status() {
        let router = Router::new().route(
            "/api/v1/ai/search",
            post(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = client_for(router).await;

        let err = client
            .search("hoa", &SessionId::new("s-1"), 20)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_search_sends_literal_query_and_session() {
        let router = Router::new().route(
            "/api/v1/ai/search",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["query"], "hoa hồng đỏ giá 500k");
                assert_eq!(body["session_id"], "sess-42");
                assert_eq!(body["limit"], 20);
                Json(json!({
                    "success": true,
                    "query": body["query"],
                    "intent": {"price_max": 500_000, "flower_type": "roses", "color": "red"},
                    "results": [],
                    "count": 0
                }))
            }),
        );
        let client = client_for(router).await;

        let response = client
            .search("hoa hồng đỏ giá 500k", &SessionId::new("sess-42"), 20)
            .await
            .unwrap();
        assert_eq!(response.intent.flower_type.as_deref(), Some("roses"));
        assert!(response.intent.occasion.is_none());
    }

    #[tokio::test]
    async fn test_recommendations_body_and_envelope() {
        let router = Router::new().route(
            "/api/v1/ai/recommendations",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["context"], "pdp");
                assert_eq!(body["product_id"], "p-9");
                assert_eq!(body["limit"], 6);
                Json(json!({
                    "success": true,
                    "recommendations": [
                        {"id": "p-1", "name": "Lan hồ điệp", "price": 900000.0, "images": []}
                    ],
                    "context": "pdp",
                    "algorithm": "hybrid"
                }))
            }),
        );
        let client = client_for(router).await;

        let list = client
            .recommendations(RecommendationContext::ProductDetail, Some(&ProductId::new("p-9")), 6)
            .await
            .unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.algorithm, "hybrid");
    }

    #[tokio::test]
    async fn test_suggestions_unwraps_envelope() {
        let router = Router::new().route(
            "/api/v1/ai/search/suggestions",
            get(|Query(q): Query<std::collections::HashMap<String, String>>| async move {
                Json(json!({
                    "success": true,
                    "query": q.get("q"),
                    "suggestions": ["hoa hồng đỏ", "hoa hồng trắng"]
                }))
            }),
        );
        let client = client_for(router).await;

        let suggestions = client.suggestions("hoa h", 5).await.unwrap();
        assert_eq!(suggestions, vec!["hoa hồng đỏ", "hoa hồng trắng"]);
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let router = Router::new().route(
            "/api/v1/social/feed",
            get(|| async { "<html>maintenance</html>" }),
        );
        let client = client_for(router).await;

        let err = client.social_feed(1, 12).await.unwrap_err();
        assert!(matches!(err, ApiError::Shared(inner) if matches!(*inner, ApiError::Parse(_))));
    }
}
