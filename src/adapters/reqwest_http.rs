//! Reqwest-based HTTP transport adapter.
//!
//! Production implementation of the [`HttpClient`] trait. The wrapped
//! client carries a cookie store (session cookies ride along on every
//! request) and the configured timeout, so a hung connection surfaces as
//! [`TransportError::Timeout`] instead of loading forever.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::traits::{Headers, HttpClient, HttpRequest, Method, Response, TransportError};

/// HTTP transport implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a client with the given transport timeout.
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// Create a client from a [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.request_timeout)
    }

    /// Create a client wrapping a custom `reqwest::Client`.
    ///
    /// This allows for advanced configuration like custom connection
    /// pools or TLS settings.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying `reqwest::Client`.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Convert a reqwest error to a TransportError.
    fn convert_error(err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            return TransportError::Timeout(err.to_string());
        }
        if err.is_connect() {
            return TransportError::ConnectionFailed(err.to_string());
        }
        if err.is_builder() {
            return TransportError::InvalidUrl(err.to_string());
        }
        if err.is_body() || err.is_decode() {
            return TransportError::Io(err.to_string());
        }
        let text = err.to_string();
        let lowered = text.to_lowercase();
        if lowered.contains("tls") || lowered.contains("ssl") || lowered.contains("certificate") {
            TransportError::Tls(text)
        } else if lowered.contains("dns") || lowered.contains("resolve") {
            TransportError::DnsFailure(text)
        } else {
            TransportError::Other(text)
        }
    }

    /// Convert reqwest headers to our Headers type.
    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_REQUEST_TIMEOUT)
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: &HttpRequest) -> Result<Response, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Put => self.client.put(&request.url),
            Method::Patch => self.client.patch(&request.url),
            Method::Delete => self.client.delete(&request.url),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(Response::with_headers(status, headers, body))
    }
}
