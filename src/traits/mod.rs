//! Trait abstractions for dependency injection and testability.
//!
//! This module provides trait-based abstractions for the two external
//! boundaries of the client, enabling dependency injection and mocking:
//!
//! - [`HttpClient`] - HTTP transport operations
//! - [`TokenStore`] - credential token storage

pub mod http;
pub mod token_store;

pub use http::{Headers, HttpClient, HttpRequest, Method, Response, TransportError};
pub use token_store::{TokenKind, TokenStore};
