//! Lantern - resilient API client with backend connectivity tracking
//!
//! The client executes authenticated requests against a single backend,
//! refreshes expired access tokens with one bounded retry, classifies
//! failures into network / HTTP / auth kinds, and broadcasts
//! backend-online transitions to decoupled observers.
//!
//! # Example
//!
//! ```ignore
//! use lantern::{ApiClient, ClientConfig};
//!
//! let client = ApiClient::from_config(ClientConfig::from_env());
//! let _observer = client.observe(|t| {
//!     if t.is_online && t.was_offline {
//!         // hide the offline banner
//!     }
//! });
//!
//! match client.get("chat/history").await {
//!     Ok(response) => { /* render */ }
//!     Err(err) if err.is_silent() => { /* offline banner already up */ }
//!     Err(err) => eprintln!("{}", err.user_message()),
//! }
//! ```

pub mod adapters;
pub mod auth;
pub mod client;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod traits;

pub use auth::{RefreshOutcome, TokenRefresher};
pub use client::{ApiClient, RequestOptions, MAX_RETRIES};
pub use config::ClientConfig;
pub use connectivity::{ConnectivityObserver, ConnectivityState, Transition};
pub use error::ApiError;
pub use traits::{Headers, HttpClient, Method, Response, TokenKind, TokenStore};
