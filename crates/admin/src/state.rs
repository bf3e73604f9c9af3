//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{BackendError, SettingsClient};
use crate::config::AdminConfig;
use crate::settings::SettingsService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    settings: SettingsService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, BackendError> {
        let client = SettingsClient::new(&config.backend)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                settings: SettingsService::new(client),
                config,
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the settings service.
    #[must_use]
    pub fn settings(&self) -> &SettingsService {
        &self.inner.settings
    }
}
