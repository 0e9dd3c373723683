//! Concrete implementations of trait abstractions.
//!
//! This module provides production adapters implementing the traits
//! defined in `crate::traits`, enabling dependency injection and
//! testability.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP transport using reqwest
//! - [`FileTokenStore`] - token storage in `~/.lantern/.tokens.json`
//! - [`MemoryTokenStore`] - process-local token storage
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - scripted HTTP outcomes

pub mod file_token_store;
pub mod memory_token_store;
pub mod mock;
pub mod reqwest_http;

pub use file_token_store::FileTokenStore;
pub use memory_token_store::MemoryTokenStore;
pub use mock::MockHttpClient;
pub use reqwest_http::ReqwestHttpClient;
