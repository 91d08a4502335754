//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiError, FrikiBoxClient};
use crate::config::StorefrontConfig;
use crate::services::{AuthService, CartMirror};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Per-visitor data is not kept
/// here; handlers load it from the session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: FrikiBoxClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote client cannot be built from the
    /// configured base URL.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = FrikiBoxClient::new(&config.api)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, api }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the FrikiBox service client.
    #[must_use]
    pub fn api(&self) -> &FrikiBoxClient {
        &self.inner.api
    }

    /// Authentication service for the configured mode.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.inner.api, self.inner.config.auth_mode)
    }

    /// Remote cart mirror.
    #[must_use]
    pub fn cart_mirror(&self) -> CartMirror<'_> {
        CartMirror::new(&self.inner.api)
    }
}
