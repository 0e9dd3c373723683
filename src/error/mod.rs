//! Error taxonomy for the API client.
//!
//! Every failure a caller can observe is an [`ApiError`] in one of three
//! kinds:
//!
//! | Kind | Cause | Credentials | Retry |
//! |------|-------|-------------|-------|
//! | Network | no response received | preserved | never refreshed |
//! | Http | non-2xx status | preserved | one refresh-and-retry cycle |
//! | Auth | refresh affirmatively rejected | access+refresh cleared | terminal |
//!
//! The network/auth distinction is load-bearing: classifying a real
//! rejection as an outage would preserve stale credentials, while
//! classifying an outage as a rejection would wipe valid credentials
//! whenever the backend goes down. [`classify_transport_error`] is the
//! single place that decision is made.

use std::fmt;

use crate::traits::TransportError;

/// A classified request failure.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// The backend could not be reached at all.
    Network {
        /// URL of the attempt that failed.
        url: String,
        message: String,
    },

    /// The backend responded with a non-2xx status.
    Http { status: u16, message: String },

    /// The backend affirmatively rejected the refresh credentials.
    Auth { message: String },
}

impl ApiError {
    /// Build a network error for a failed attempt.
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Build an HTTP status error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            message: message.into(),
        }
    }

    /// Build an auth error.
    pub fn auth(message: impl Into<String>) -> Self {
        ApiError::Auth {
            message: message.into(),
        }
    }

    /// Whether this failure should be handled without verbose logging.
    ///
    /// Network errors are silent: under a sustained outage every request
    /// fails the same way and the connectivity state already tells the
    /// story once.
    pub fn is_silent(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    /// Whether the caller must send the user back through login.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, ApiError::Auth { .. })
    }

    /// HTTP status code, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Network { .. } => "E_API_NETWORK",
            ApiError::Http { .. } => "E_API_HTTP",
            ApiError::Auth { .. } => "E_API_AUTH",
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network { .. } => {
                "Unable to reach the server. Please check your connection.".to_string()
            }
            ApiError::Http { status, .. } => match *status {
                400 => "The request was invalid. Please try again.".to_string(),
                401 => "Authentication required. Please sign in again.".to_string(),
                403 => "Access denied. You don't have permission for this action.".to_string(),
                404 => "The requested resource was not found.".to_string(),
                500..=599 => {
                    "The server is experiencing issues. Please try again later.".to_string()
                }
                _ => format!("The server returned an error (HTTP {}).", status),
            },
            ApiError::Auth { .. } => "Your session has expired. Please sign in again.".to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network { url, message } => {
                write!(f, "Network error for '{}': {}", url, message)
            }
            ApiError::Http { status, message } => {
                write!(f, "HTTP {} error: {}", status, message)
            }
            ApiError::Auth { message } => {
                write!(f, "Authentication error: {}", message)
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Classify a transport failure.
///
/// Every [`TransportError`] means no response was received, which is the
/// defining signature of "backend unreachable", so the whole family maps
/// to [`ApiError::Network`]. Responses that did arrive are classified by
/// status elsewhere and never pass through here.
pub fn classify_transport_error(err: &TransportError, url: &str) -> ApiError {
    ApiError::network(url, err.to_string())
}
