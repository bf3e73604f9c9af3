//! Integration tests for YenFlowers.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p yen-flowers-integration-tests
//! ```
//!
//! No external services are needed. Each test starts a fake shop backend on
//! `127.0.0.1:0` with [`FakeBackend::start`] and drives the storefront or admin
//! router against it with `tower::ServiceExt::oneshot`.
//!
//! # Test Categories
//!
//! - `storefront_widgets` - Search, suggestions, recommendations, click tracking
//! - `storefront_pages` - Product and category pages against backend errors
//! - `admin_settings` - Settings load, save and partial failure

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use secrecy::SecretString;
use serde_json::Value;
use tokio::task::JoinHandle;
use url::Url;

use yen_flowers_admin::config::AdminConfig;
use yen_flowers_storefront::api::ApiClient;
use yen_flowers_storefront::config::{BackendConfig, StorefrontConfig};

/// Admin token accepted by [`FakeBackend`] tests.
pub const TEST_ADMIN_TOKEN: &str = "tok_9fQ2xLm7RkA4vZp3HsW8nYc1";

/// A request the fake backend received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Bytes,
}

impl Recorded {
    /// Body parsed as JSON, or `Null` when empty or not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

/// Shared log of received requests.
#[derive(Debug, Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<Recorded>>>);

impl RequestLog {
    fn push(&self, recorded: Recorded) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(recorded);
    }

    /// Every request so far, in arrival order.
    #[must_use]
    pub fn all(&self) -> Vec<Recorded> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Requests whose path equals `path`.
    #[must_use]
    pub fn to_path(&self, path: &str) -> Vec<Recorded> {
        self.all().into_iter().filter(|r| r.path == path).collect()
    }
}

async fn record(State(log): State<RequestLog>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    log.push(Recorded {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: bytes.clone(),
    });

    next.run(Request::from_parts(parts, axum::body::Body::from(bytes)))
        .await
}

/// A fake shop backend serving `router` on an ephemeral local port.
///
/// Every request is recorded before it reaches the router. The server stops
/// when this value is dropped.
pub struct FakeBackend {
    pub base_url: Url,
    pub log: RequestLog,
    handle: JoinHandle<()>,
}

impl FakeBackend {
    /// Bind and serve.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(router: Router) -> Self {
        let log = RequestLog::default();
        let app = router.layer(middleware::from_fn_with_state(log.clone(), record));

        #[allow(clippy::unwrap_used)]
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        #[allow(clippy::unwrap_used)]
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        #[allow(clippy::unwrap_used)]
        let base_url = Url::parse(&format!("http://{addr}")).unwrap();

        Self {
            base_url,
            log,
            handle,
        }
    }

    /// Storefront configuration pointing at this backend.
    #[must_use]
    pub fn storefront_config(&self) -> StorefrontConfig {
        StorefrontConfig {
            host: std::net::IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            backend: BackendConfig::new(self.base_url.clone()),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Storefront router backed by this backend.
    ///
    /// # Panics
    ///
    /// Panics if the backend client cannot be built.
    #[must_use]
    pub fn storefront(&self) -> Router {
        let config = self.storefront_config();
        #[allow(clippy::unwrap_used)]
        let api = ApiClient::new(&config.backend).unwrap();
        yen_flowers_storefront::routes::build_router(
            yen_flowers_storefront::state::AppState::with_client(config, api),
        )
    }

    /// Admin configuration pointing at this backend.
    #[must_use]
    pub fn admin_config(&self) -> AdminConfig {
        AdminConfig {
            host: std::net::IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            backend: yen_flowers_admin::config::BackendConfig::new(
                self.base_url.clone(),
                SecretString::from(TEST_ADMIN_TOKEN.to_string()),
            ),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Admin router backed by this backend.
    ///
    /// # Panics
    ///
    /// Panics if the backend client cannot be built.
    #[must_use]
    pub fn admin(&self) -> Router {
        #[allow(clippy::unwrap_used)]
        let state = yen_flowers_admin::state::AppState::new(self.admin_config()).unwrap();
        yen_flowers_admin::routes::build_router(state)
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Read a response body as text.
///
/// # Panics
///
/// Panics if the body cannot be read or is not UTF-8.
pub async fn body_text(response: Response) -> String {
    #[allow(clippy::unwrap_used)]
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    #[allow(clippy::unwrap_used)]
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Wait until `log` has a request to `path`, up to one second.
///
/// Fire-and-forget tracking calls land after the response is returned.
pub async fn wait_for(log: &RequestLog, path: &str) -> Option<Recorded> {
    for _ in 0..100 {
        if let Some(found) = log.to_path(path).into_iter().next() {
            return Some(found);
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    None
}
