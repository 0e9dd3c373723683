//! Authentication support for the API client.
//!
//! The only moving part here is the refresh exchange; token storage
//! itself lives behind [`TokenStore`](crate::traits::TokenStore).

pub mod refresher;

pub use refresher::{RefreshOutcome, RefreshResponse, TokenRefresher, REFRESH_PATH};
