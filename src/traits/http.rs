//! HTTP transport trait abstraction.
//!
//! Provides a trait-based abstraction over the HTTP transport, enabling
//! dependency injection and mocking in tests.
//!
//! A [`TransportError`] means no response was received at all. A server
//! response with an error status is still `Ok(Response)` here; turning
//! non-2xx statuses into typed failures is the job of
//! [`crate::error::ApiError`], which needs to tell the two situations apart.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use thiserror::Error;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// The canonical wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transport-level request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Create a GET request for the given URL.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Create a POST request for the given URL.
    pub fn post(url: impl Into<String>, body: Option<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Headers::new(),
            body,
        }
    }

    /// Add a header, replacing any existing value for the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Merge headers in, replacing existing values on collision.
    pub fn with_headers(mut self, headers: &Headers) -> Self {
        for (name, value) in headers {
            self.headers.insert(name.clone(), value.clone());
        }
        self
    }
}

/// HTTP response wrapper.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body
    pub body: Bytes,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, body: Bytes) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    /// Create a new response with headers.
    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as a string.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }

    /// Parse the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Failure to obtain any response from the server.
///
/// Every variant means the request died before a status line came back;
/// the distinctions exist for logging and error messages only.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    /// Host name did not resolve.
    #[error("dns resolution failed: {0}")]
    DnsFailure(String),
    /// The request timed out before a response arrived.
    #[error("request timed out: {0}")]
    Timeout(String),
    /// TLS handshake or certificate problem.
    #[error("tls error: {0}")]
    Tls(String),
    /// The request URL could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// Connection dropped mid-flight.
    #[error("io error: {0}")]
    Io(String),
    /// Anything else the transport could not attribute.
    #[error("transport error: {0}")]
    Other(String),
}

/// Trait for HTTP transport operations.
///
/// Implementations include the production reqwest-based client and a
/// scripted mock for tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute a request, returning the server's response.
    ///
    /// `Err` strictly means "no response received"; servers that answer
    /// with an error status produce `Ok` with that status.
    async fn execute(&self, request: &HttpRequest) -> Result<Response, TransportError>;
}
