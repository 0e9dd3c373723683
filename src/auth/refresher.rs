//! Access-token refresh.
//!
//! [`TokenRefresher`] exchanges the stored refresh token for a new
//! access token and is the only component allowed to destroy
//! credentials. The failure handling encodes the one distinction that
//! matters: an unreachable server keeps every token (an outage says
//! nothing about credential validity), while an affirmative rejection
//! clears the access and refresh tokens and tells the caller to send
//! the user back through login.

use serde::Deserialize;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::connectivity::ConnectivityState;
use crate::error::{classify_transport_error, ApiError};
use crate::traits::{HttpClient, HttpRequest, TokenKind, TokenStore};

/// Path of the refresh endpoint, relative to the base URL.
pub const REFRESH_PATH: &str = "refresh";

/// Body of a successful refresh response.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// How a successful [`TokenRefresher::refresh`] call completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// This call performed the exchange and stored a new access token.
    Refreshed,
    /// A concurrent call already refreshed while this one waited; the
    /// stored access token is current and no request was made.
    AlreadyFresh,
}

/// Performs the refresh-token exchange against `POST <base>/refresh`.
pub struct TokenRefresher {
    config: ClientConfig,
    http: Arc<dyn HttpClient>,
    tokens: Arc<dyn TokenStore>,
    connectivity: Arc<ConnectivityState>,
    /// Serializes refreshes so concurrent 401s coalesce into one exchange.
    inflight: tokio::sync::Mutex<()>,
}

impl TokenRefresher {
    /// Create a refresher over the given transport and stores.
    pub fn new(
        config: ClientConfig,
        http: Arc<dyn HttpClient>,
        tokens: Arc<dyn TokenStore>,
        connectivity: Arc<ConnectivityState>,
    ) -> Self {
        Self {
            config,
            http,
            tokens,
            connectivity,
            inflight: tokio::sync::Mutex::new(()),
        }
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Concurrent callers are serialized; a caller that waited out
    /// someone else's successful exchange observes the new token and
    /// returns [`RefreshOutcome::AlreadyFresh`] without a second
    /// round trip.
    pub async fn refresh(&self) -> Result<RefreshOutcome, ApiError> {
        let before = self.tokens.get(TokenKind::Access);
        let _guard = self.inflight.lock().await;

        let current = self.tokens.get(TokenKind::Access);
        if current.is_some() && current != before {
            return Ok(RefreshOutcome::AlreadyFresh);
        }

        self.execute_refresh().await
    }

    async fn execute_refresh(&self) -> Result<RefreshOutcome, ApiError> {
        let url = self.config.endpoint(REFRESH_PATH);

        let Some(refresh_token) = self.tokens.get(TokenKind::Refresh) else {
            // Nothing to exchange; the access token is dead weight too.
            self.tokens.clear(TokenKind::Access);
            return Err(ApiError::auth("no refresh token available"));
        };

        let request = HttpRequest::post(url.as_str(), None)
            .with_header("Content-Type", "application/json")
            .with_header("Authorization", format!("Bearer {}", refresh_token));

        let response = match self.http.execute(&request).await {
            Ok(response) => response,
            Err(transport) => {
                // An outage is not evidence the refresh token is invalid:
                // keep every credential and fail silently.
                self.connectivity.report(false);
                return Err(classify_transport_error(&transport, &url));
            }
        };

        // The server answered, whatever it said.
        self.connectivity.report(true);

        if !response.is_success() {
            tracing::warn!(status = response.status, "refresh token rejected");
            self.revoke_credentials();
            return Err(ApiError::auth(format!(
                "refresh rejected with status {}",
                response.status
            )));
        }

        match response.json::<RefreshResponse>() {
            Ok(body) => {
                self.tokens.set(TokenKind::Access, &body.access_token);
                tracing::debug!("access token refreshed");
                Ok(RefreshOutcome::Refreshed)
            }
            Err(err) => {
                self.revoke_credentials();
                Err(ApiError::auth(format!("invalid refresh response: {}", err)))
            }
        }
    }

    /// Drop the credentials the server just refused to honor. The
    /// session token is left alone.
    fn revoke_credentials(&self) {
        self.tokens.clear(TokenKind::Access);
        self.tokens.clear(TokenKind::Refresh);
    }
}

impl std::fmt::Debug for TokenRefresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRefresher")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::adapters::MemoryTokenStore;
    use crate::traits::{Response, TransportError};
    use bytes::Bytes;

    fn build_refresher(
        mock: &MockHttpClient,
        tokens: Arc<MemoryTokenStore>,
    ) -> (TokenRefresher, Arc<ConnectivityState>) {
        let connectivity = Arc::new(ConnectivityState::new());
        let refresher = TokenRefresher::new(
            ClientConfig::new("http://localhost:5000"),
            Arc::new(mock.clone()),
            tokens,
            connectivity.clone(),
        );
        (refresher, connectivity)
    }

    #[tokio::test]
    async fn test_successful_refresh_stores_access_token() {
        let mock = MockHttpClient::new();
        mock.enqueue(MockResponse::Success(Response::new(
            200,
            Bytes::from(r#"{"accessToken":"a2"}"#),
        )));
        let tokens = Arc::new(MemoryTokenStore::with_tokens(Some("a1"), Some("r1"), None));
        let (refresher, connectivity) = build_refresher(&mock, tokens.clone());

        let outcome = refresher.refresh().await.unwrap();

        assert_eq!(outcome, RefreshOutcome::Refreshed);
        assert_eq!(tokens.get(TokenKind::Access).as_deref(), Some("a2"));
        assert_eq!(tokens.get(TokenKind::Refresh).as_deref(), Some("r1"));
        assert!(connectivity.is_online());

        let recorded = mock.requests();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].url, "http://localhost:5000/refresh");
        assert_eq!(
            recorded[0].headers.get("Authorization"),
            Some(&"Bearer r1".to_string())
        );
    }

    #[tokio::test]
    async fn test_network_failure_keeps_credentials() {
        let mock = MockHttpClient::new();
        mock.enqueue(MockResponse::Error(TransportError::ConnectionFailed(
            "refused".to_string(),
        )));
        let tokens = Arc::new(MemoryTokenStore::with_tokens(
            Some("a1"),
            Some("r1"),
            Some("s1"),
        ));
        let (refresher, connectivity) = build_refresher(&mock, tokens.clone());

        let err = refresher.refresh().await.unwrap_err();

        assert!(err.is_silent());
        assert!(!err.requires_reauth());
        assert_eq!(tokens.get(TokenKind::Access).as_deref(), Some("a1"));
        assert_eq!(tokens.get(TokenKind::Refresh).as_deref(), Some("r1"));
        assert!(!connectivity.is_online());
    }

    #[tokio::test]
    async fn test_rejected_refresh_clears_access_and_refresh_only() {
        let mock = MockHttpClient::new();
        mock.enqueue(MockResponse::Success(Response::new(
            401,
            Bytes::from(r#"{"error":"invalid_grant"}"#),
        )));
        let tokens = Arc::new(MemoryTokenStore::with_tokens(
            Some("a1"),
            Some("r1"),
            Some("s1"),
        ));
        let (refresher, connectivity) = build_refresher(&mock, tokens.clone());

        let err = refresher.refresh().await.unwrap_err();

        assert!(err.requires_reauth());
        assert_eq!(tokens.get(TokenKind::Access), None);
        assert_eq!(tokens.get(TokenKind::Refresh), None);
        assert_eq!(tokens.get(TokenKind::Session).as_deref(), Some("s1"));
        // The server is reachable; it just refused the credentials.
        assert!(connectivity.is_online());
    }

    #[tokio::test]
    async fn test_missing_refresh_token_fails_without_round_trip() {
        let mock = MockHttpClient::new();
        let tokens = Arc::new(MemoryTokenStore::with_tokens(Some("a1"), None, None));
        let (refresher, _connectivity) = build_refresher(&mock, tokens.clone());

        let err = refresher.refresh().await.unwrap_err();

        assert!(err.requires_reauth());
        assert_eq!(tokens.get(TokenKind::Access), None);
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_refresh_body_revokes_credentials() {
        let mock = MockHttpClient::new();
        mock.enqueue(MockResponse::Success(Response::new(
            200,
            Bytes::from("not json"),
        )));
        let tokens = Arc::new(MemoryTokenStore::with_tokens(Some("a1"), Some("r1"), None));
        let (refresher, _connectivity) = build_refresher(&mock, tokens.clone());

        let err = refresher.refresh().await.unwrap_err();

        assert!(err.requires_reauth());
        assert_eq!(tokens.get(TokenKind::Access), None);
        assert_eq!(tokens.get(TokenKind::Refresh), None);
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_coalesce() {
        let mock = MockHttpClient::new();
        mock.set_latency(std::time::Duration::from_millis(50));
        mock.enqueue(MockResponse::Success(Response::new(
            200,
            Bytes::from(r#"{"accessToken":"a2"}"#),
        )));
        let tokens = Arc::new(MemoryTokenStore::with_tokens(Some("a1"), Some("r1"), None));
        let (refresher, _connectivity) = build_refresher(&mock, tokens.clone());

        let (first, second) = tokio::join!(refresher.refresh(), refresher.refresh());

        let outcomes = [first.unwrap(), second.unwrap()];
        assert!(outcomes.contains(&RefreshOutcome::Refreshed));
        assert!(outcomes.contains(&RefreshOutcome::AlreadyFresh));
        assert_eq!(mock.request_count("/refresh"), 1);
        assert_eq!(tokens.get(TokenKind::Access).as_deref(), Some("a2"));
    }
}
