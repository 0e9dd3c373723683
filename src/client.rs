//! Authenticated request orchestration.
//!
//! [`ApiClient`] is the single entry point feature code uses to talk to
//! the backend. Each call attaches credentials, executes through the
//! injected transport, classifies the outcome, feeds the connectivity
//! state, and runs at most one refresh-and-retry cycle before giving
//! the caller a typed error.

use std::sync::Arc;

use crate::adapters::{FileTokenStore, MemoryTokenStore, ReqwestHttpClient};
use crate::auth::TokenRefresher;
use crate::config::ClientConfig;
use crate::connectivity::{ConnectivityObserver, ConnectivityState, Transition};
use crate::error::{classify_transport_error, ApiError};
use crate::traits::{
    Headers, HttpClient, HttpRequest, Method, Response, TokenKind, TokenStore,
};

/// Maximum refresh-and-retry cycles per original call.
pub const MAX_RETRIES: u32 = 1;

/// Caller-supplied request parameters.
///
/// Defaults to a GET with no extra headers and no body. Caller headers
/// take precedence over the computed `Authorization` header.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Headers,
    pub body: Option<String>,
}

impl RequestOptions {
    /// Options for the given method.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: Headers::new(),
            body: None,
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::Get)
    }
}

/// Resilient API client.
///
/// Owns the refresh logic and shares its [`ConnectivityState`] with any
/// number of observers. Cheap to share behind an `Arc`; in-flight
/// requests are independent of each other.
pub struct ApiClient {
    config: ClientConfig,
    http: Arc<dyn HttpClient>,
    tokens: Arc<dyn TokenStore>,
    connectivity: Arc<ConnectivityState>,
    refresher: TokenRefresher,
}

impl ApiClient {
    /// Create a client over explicit collaborators.
    pub fn new(
        config: ClientConfig,
        http: Arc<dyn HttpClient>,
        tokens: Arc<dyn TokenStore>,
        connectivity: Arc<ConnectivityState>,
    ) -> Self {
        let refresher = TokenRefresher::new(
            config.clone(),
            http.clone(),
            tokens.clone(),
            connectivity.clone(),
        );
        Self {
            config,
            http,
            tokens,
            connectivity,
            refresher,
        }
    }

    /// Production wiring: reqwest transport and file-backed tokens.
    ///
    /// Falls back to in-memory token storage when no home directory is
    /// available, which degrades to an unauthenticated state instead of
    /// failing.
    pub fn from_config(config: ClientConfig) -> Self {
        let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::from_config(&config));
        let tokens: Arc<dyn TokenStore> = match FileTokenStore::new() {
            Some(store) => Arc::new(store),
            None => Arc::new(MemoryTokenStore::new()),
        };
        let connectivity = Arc::new(ConnectivityState::new());
        Self::new(config, http, tokens, connectivity)
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Shared connectivity state fed by this client.
    pub fn connectivity(&self) -> Arc<ConnectivityState> {
        self.connectivity.clone()
    }

    /// The token store this client reads credentials from.
    pub fn tokens(&self) -> Arc<dyn TokenStore> {
        self.tokens.clone()
    }

    /// The refresher owned by this client.
    pub fn refresher(&self) -> &TokenRefresher {
        &self.refresher
    }

    /// Attach an observer to this client's connectivity state.
    pub fn observe(
        &self,
        on_transition: impl Fn(Transition) + Send + Sync + 'static,
    ) -> ConnectivityObserver {
        ConnectivityObserver::new(self.connectivity.clone(), on_transition)
    }

    /// Compute the default `Authorization` header.
    ///
    /// Prefers the access token; falls back to the session token. With
    /// neither present the request goes out unauthenticated.
    pub fn auth_headers(&self) -> Headers {
        let mut headers = Headers::new();
        let token = self
            .tokens
            .get(TokenKind::Access)
            .or_else(|| self.tokens.get(TokenKind::Session));
        if let Some(token) = token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }

    /// GET a path with default options.
    pub async fn get(&self, path: &str) -> Result<Response, ApiError> {
        self.request(path, RequestOptions::default()).await
    }

    /// POST a JSON value to a path.
    pub async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<Response, ApiError> {
        let options = RequestOptions::new(Method::Post)
            .with_header("Content-Type", "application/json")
            .with_body(body.to_string());
        self.request(path, options).await
    }

    /// Execute an authenticated request against an API path.
    ///
    /// The connectivity state is updated exactly once per attempt. A
    /// transport failure is terminal and silent; refreshing into a dead
    /// backend only delays offline detection. A non-2xx response
    /// triggers one refresh-and-retry cycle, and whatever the refresher
    /// fails with is propagated as-is.
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, ApiError> {
        let url = self.config.endpoint(path);
        let mut attempt: u32 = 0;

        loop {
            // Auth headers are recomputed per attempt so a retry after a
            // refresh carries the new access token.
            let request = HttpRequest {
                method: options.method,
                url: url.clone(),
                headers: Headers::new(),
                body: options.body.clone(),
            }
            .with_headers(&self.auth_headers())
            .with_headers(&options.headers);

            tracing::debug!(%url, attempt, "issuing request");

            let response = match self.http.execute(&request).await {
                Ok(response) => response,
                Err(transport) => {
                    self.connectivity.report(false);
                    return Err(classify_transport_error(&transport, &url));
                }
            };

            self.connectivity.report(true);

            if response.is_success() {
                return Ok(response);
            }

            let snippet: String = response
                .text()
                .unwrap_or_default()
                .chars()
                .take(200)
                .collect();
            let status_err = ApiError::http(response.status, snippet);

            if attempt >= MAX_RETRIES {
                return Err(status_err);
            }

            tracing::debug!(
                status = response.status,
                "request failed, attempting token refresh"
            );
            self.refresher.refresh().await?;
            attempt += 1;
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish()
    }
}
