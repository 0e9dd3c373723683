//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use lantern::adapters::{MemoryTokenStore, ReqwestHttpClient};
use lantern::connectivity::{ConnectivityState, Subscription, Transition};
use lantern::{ApiClient, ClientConfig};

/// Build a client against a live test server with seeded tokens.
pub fn client_for(base_url: &str, tokens: MemoryTokenStore) -> ApiClient {
    client_with_timeout(base_url, tokens, Duration::from_secs(5))
}

/// Same as [`client_for`] with an explicit transport timeout.
pub fn client_with_timeout(
    base_url: &str,
    tokens: MemoryTokenStore,
    timeout: Duration,
) -> ApiClient {
    let config = ClientConfig::new(base_url).with_timeout(timeout);
    let http = Arc::new(ReqwestHttpClient::from_config(&config));
    ApiClient::new(
        config,
        http,
        Arc::new(tokens),
        Arc::new(ConnectivityState::new()),
    )
}

/// Install a test subscriber once so `RUST_LOG` can surface client logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Record every transition the given state emits.
pub fn record_transitions(
    state: &ConnectivityState,
) -> (Arc<Mutex<Vec<Transition>>>, Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let subscription = state.subscribe(move |t| sink.lock().unwrap().push(t));
    (seen, subscription)
}
