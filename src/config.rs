//! Client configuration.
//!
//! Resolves the backend host from the environment and carries the
//! request timeout applied to the underlying transport.

use std::time::Duration;

/// Default URL for the Lantern backend API.
pub const DEFAULT_API_HOST: &str = "https://api.lantern.app";

/// Environment variable that overrides the backend host.
pub const API_HOST_ENV: &str = "LANTERN_API_HOST";

/// Default transport timeout. A hung connection past this point surfaces
/// as a network failure instead of loading forever.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`ApiClient`](crate::client::ApiClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the backend, without a trailing slash requirement.
    pub base_url: String,
    /// Timeout applied to every transport attempt.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for the given base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Resolve the configuration from the environment.
    ///
    /// Reads [`API_HOST_ENV`], falling back to [`DEFAULT_API_HOST`] when the
    /// variable is unset or empty.
    pub fn from_env() -> Self {
        let base_url = std::env::var(API_HOST_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_HOST.to_string());
        Self::new(base_url)
    }

    /// Override the transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build the absolute URL for an API path.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
