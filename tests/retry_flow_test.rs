//! Integration tests for the refresh-and-retry flow.
//!
//! These tests pin down the retry contract:
//! - a non-2xx response triggers exactly one refresh-and-retry cycle
//! - a successful refresh re-issues the original request with the new token
//! - a rejected refresh is terminal and clears credentials
//! - successful requests never touch the refresh endpoint

mod common;

use common::client_for;
use lantern::adapters::MemoryTokenStore;
use lantern::TokenKind;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn refresh_ok(access_token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "accessToken": access_token
    }))
}

// ============================================================================
// Bounded retry: persistent server error
// ============================================================================

#[tokio::test]
async fn test_persistent_error_performs_exactly_one_refresh_cycle() {
    common::init_tracing();

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/refresh"))
        .respond_with(refresh_ok("a2"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(
        &server.uri(),
        MemoryTokenStore::with_tokens(Some("a1"), Some("r1"), None),
    );

    let err = client.get("documents").await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(!err.is_silent());
    assert!(!err.requires_reauth());
}

// ============================================================================
// Reactive refresh on 401 → success
// ============================================================================

#[tokio::test]
async fn test_auto_refresh_on_401_reissues_with_new_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat/history"))
        .and(header("Authorization", "Bearer expired-token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/refresh"))
        .and(header("Authorization", "Bearer valid-refresh"))
        .respond_with(refresh_ok("fresh-token"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/chat/history"))
        .and(header("Authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("history"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(
        &server.uri(),
        MemoryTokenStore::with_tokens(Some("expired-token"), Some("valid-refresh"), None),
    );

    let response = client.get("chat/history").await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.text().unwrap(), "history");
    assert_eq!(
        client.tokens().get(TokenKind::Access).as_deref(),
        Some("fresh-token")
    );
}

// ============================================================================
// Rejected refresh is terminal
// ============================================================================

#[tokio::test]
async fn test_rejected_refresh_is_terminal_and_clears_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chat/history"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_grant"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(
        &server.uri(),
        MemoryTokenStore::with_tokens(Some("a1"), Some("stale-refresh"), Some("s1")),
    );

    let err = client.get("chat/history").await.unwrap_err();

    assert!(err.requires_reauth());
    assert_eq!(client.tokens().get(TokenKind::Access), None);
    assert_eq!(client.tokens().get(TokenKind::Refresh), None);
    // Session cookie auth still works after a bad refresh token.
    assert_eq!(client.tokens().get(TokenKind::Session).as_deref(), Some("s1"));
    // The server is reachable, it just said no.
    assert!(client.connectivity().is_online());
}

// ============================================================================
// No refresh on the happy path
// ============================================================================

#[tokio::test]
async fn test_successful_request_never_calls_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/leaderboard"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/refresh"))
        .respond_with(refresh_ok("a2"))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(
        &server.uri(),
        MemoryTokenStore::with_tokens(Some("a1"), Some("r1"), None),
    );

    let response = client.get("leaderboard").await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(
        client.tokens().get(TokenKind::Access).as_deref(),
        Some("a1")
    );
}

// ============================================================================
// Concurrent 401s coalesce into a single refresh
// ============================================================================

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(header("Authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    // Slow refresh so the second caller is still waiting when the
    // first one finishes the exchange.
    Mock::given(method("POST"))
        .and(path("/refresh"))
        .respond_with(refresh_ok("new").set_delay(std::time::Duration::from_millis(200)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(header("Authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("docs"))
        .expect(2)
        .mount(&server)
        .await;

    let client = std::sync::Arc::new(client_for(
        &server.uri(),
        MemoryTokenStore::with_tokens(Some("old"), Some("r1"), None),
    ));

    let first = {
        let client = client.clone();
        tokio::spawn(async move { client.get("documents").await })
    };
    let second = {
        let client = client.clone();
        tokio::spawn(async move { client.get("documents").await })
    };

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();

    assert_eq!(first.status, 200);
    assert_eq!(second.status, 200);
    assert_eq!(client.tokens().get(TokenKind::Access).as_deref(), Some("new"));
}
