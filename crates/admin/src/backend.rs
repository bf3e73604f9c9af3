//! Client for the shop backend's settings endpoints.
//!
//! ```text
//! GET   /admin/settings          -> { "<section>": { ... }, ... }
//! PATCH /admin/settings/{key}    <- { ...section fields... }
//! ```
//!
//! Every call carries the admin bearer token.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use yen_flowers_core::SettingsSection;

use crate::config::BackendConfig;

/// Longest response body excerpt kept in errors and logs.
const LOG_BODY_LIMIT: usize = 500;

/// Errors from settings calls.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings API client.
///
/// Cheaply cloneable; clones share the connection pool.
#[derive(Clone)]
pub struct SettingsClient {
    inner: Arc<SettingsClientInner>,
}

struct SettingsClientInner {
    client: reqwest::Client,
    base_url: String,
    token: SecretString,
}

impl SettingsClient {
    /// Create a new settings client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(SettingsClientInner {
                client,
                base_url: config.api_url.as_str().trim_end_matches('/').to_string(),
                token: config.api_token.clone(),
            }),
        })
    }

    /// Every stored section, keyed by section name.
    ///
    /// Keys the admin panel does not know are passed through untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a JSON object.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<HashMap<String, Value>, BackendError> {
        let response = self
            .inner
            .client
            .get(format!("{}/admin/settings", self.inner.base_url))
            .bearer_auth(self.inner.token.expose_secret())
            .send()
            .await?;

        let body = check(response).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, body = %excerpt(&body), "Failed to parse settings");
            BackendError::Parse(e)
        })
    }

    /// Replace one section.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the update.
    #[instrument(skip(self, value), fields(section = %section))]
    pub async fn patch_section(
        &self,
        section: SettingsSection,
        value: &Value,
    ) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .patch(format!(
                "{}/admin/settings/{}",
                self.inner.base_url,
                section.key()
            ))
            .bearer_auth(self.inner.token.expose_secret())
            .json(value)
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }
}

/// Return the body of a success response, or a `Status` error.
async fn check(response: reqwest::Response) -> Result<String, BackendError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %excerpt(&body),
            "Settings call returned non-success status"
        );
        return Err(BackendError::Status {
            status,
            body: excerpt(&body),
        });
    }

    Ok(body)
}

fn excerpt(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}
