//! Mock HTTP transport for testing.
//!
//! Provides a configurable mock transport that can return predefined
//! responses or transport errors, and records every request for
//! verification. Scripted responses (a FIFO queue) take precedence over
//! per-URL routes, which take precedence over the default response.
//! The queue is what outage scenarios use to fail a few attempts and
//! then recover.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::traits::{Headers, HttpClient, HttpRequest, Method, Response, TransportError};

/// A recorded request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
}

/// Configuration for a mock outcome.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status).
    Success(Response),
    /// Fail at the transport level, as if no response arrived.
    Error(TransportError),
}

/// Mock transport for testing.
///
/// # Example
///
/// ```ignore
/// use lantern::adapters::mock::{MockHttpClient, MockResponse};
/// use lantern::traits::{HttpClient, HttpRequest, Response, TransportError};
/// use bytes::Bytes;
///
/// let mock = MockHttpClient::new();
/// mock.enqueue(MockResponse::Error(TransportError::ConnectionFailed("refused".into())));
/// mock.enqueue(MockResponse::Success(Response::new(200, Bytes::from("ok"))));
///
/// // First call fails at the transport, second one succeeds.
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// FIFO of scripted outcomes, consumed before anything else.
    script: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Repeatable outcomes by exact URL.
    routes: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Fallback outcome when nothing else matches.
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification.
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Artificial delay applied to every request.
    latency: Arc<Mutex<Option<std::time::Duration>>>,
}

impl MockHttpClient {
    /// Create a new mock transport with nothing configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scripted outcome. Each is consumed by exactly one request.
    pub fn enqueue(&self, response: MockResponse) {
        self.script.lock().unwrap().push_back(response);
    }

    /// Set a repeatable outcome for an exact URL.
    pub fn set_route(&self, url: &str, response: MockResponse) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    /// Set the fallback outcome for unmatched requests.
    pub fn set_default(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Count recorded requests whose URL contains `needle`.
    pub fn request_count(&self, needle: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.contains(needle))
            .count()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Delay every request by `latency`, so tests can overlap in-flight
    /// calls deterministically.
    pub fn set_latency(&self, latency: std::time::Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: &HttpRequest) -> Result<Response, TransportError> {
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method,
            url: request.url.clone(),
            headers: request.headers.clone(),
            body: request.body.clone(),
        });

        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.routes.lock().unwrap().get(&request.url).cloned())
            .or_else(|| self.default_response.lock().unwrap().clone());

        match outcome {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(TransportError::Other(format!(
                "no mock response configured for {}",
                request.url
            ))),
        }
    }
}
