//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. The session carries the
//! anonymous visitor id sent with searches and tracking events, and the cart.

use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};
use uuid::Uuid;

use yen_flowers_core::{CartItem, SessionId};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "yf_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Session keys.
pub mod keys {
    /// Anonymous visitor id used for search and recommendation tracking.
    pub const VISITOR_ID: &str = "visitor_id";

    /// Cart lines.
    pub const CART: &str = "cart";
}

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// The visitor id for this session, created on first use.
///
/// A session store failure yields a fresh id for this request only.
pub async fn session_id(session: &Session) -> SessionId {
    match session.get::<SessionId>(keys::VISITOR_ID).await {
        Ok(Some(id)) => return id,
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Failed to read visitor id from session"),
    }

    let id = SessionId::new(Uuid::new_v4().to_string());
    if let Err(e) = session.insert(keys::VISITOR_ID, &id).await {
        tracing::error!(error = %e, "Failed to save visitor id to session");
    }
    id
}

/// Cart lines stored in the session.
pub async fn cart_items(session: &Session) -> Vec<CartItem> {
    session
        .get::<Vec<CartItem>>(keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Replace the session cart.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn set_cart_items(
    session: &Session,
    items: &[CartItem],
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, items).await
}
