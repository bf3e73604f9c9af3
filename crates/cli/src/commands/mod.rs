//! Command implementations.

pub mod recommend;
pub mod search;
pub mod suggest;

use thiserror::Error;
use yen_flowers_storefront::api::{ApiClient, ApiError};
use yen_flowers_storefront::config::{BackendConfig, ConfigError, parse_api_url};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// No backend URL was given.
    #[error("Missing backend URL: pass --api-url or set BACKEND_API_URL")]
    MissingApiUrl,

    /// Backend URL did not parse.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Backend call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Reading stdin failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build a backend client from the `--api-url` value.
pub fn client(api_url: Option<&str>) -> Result<ApiClient, CliError> {
    let api_url = parse_api_url(api_url.ok_or(CliError::MissingApiUrl)?)?;
    Ok(ApiClient::new(&BackendConfig::new(api_url))?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_url() {
        assert!(matches!(client(None), Err(CliError::MissingApiUrl)));
    }

    #[test]
    fn test_client_rejects_bad_scheme() {
        assert!(matches!(
            client(Some("ftp://example.com")),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_client_accepts_http_url() {
        assert!(client(Some("http://localhost:8000/api/v1")).is_ok());
    }
}
