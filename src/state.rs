//! Shared application state injected into every handler.

use axum::http::StatusCode;
use std::sync::Arc;

use crate::application::services::LinkService;

/// Host used to build short URLs when neither `BASE_URL` nor a `Host` header is present.
pub const DEFAULT_HOST: &str = "localhost:8080";

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    /// Public prefix for short URLs; derived from the `Host` header when `None`.
    pub base_url: Option<String>,
    pub redirect_status: StatusCode,
}

impl AppState {
    /// Creates state with no fixed base URL and `301 Moved Permanently` redirects.
    pub fn new(link_service: Arc<LinkService>) -> Self {
        Self {
            link_service,
            base_url: None,
            redirect_status: StatusCode::MOVED_PERMANENTLY,
        }
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_redirect_status(mut self, redirect_status: StatusCode) -> Self {
        self.redirect_status = redirect_status;
        self
    }

    /// Resolves the prefix for short URLs, preferring the configured base URL.
    pub fn public_base_url(&self, host: Option<&str>) -> String {
        match &self.base_url {
            Some(base_url) => base_url.clone(),
            None => format!(
                "http://{}",
                host.filter(|h| !h.is_empty()).unwrap_or(DEFAULT_HOST)
            ),
        }
    }
}
