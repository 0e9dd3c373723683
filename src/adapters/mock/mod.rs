//! Mock implementations for testing.
//!
//! Test doubles for the transport boundary, enabling unit and
//! integration testing without network access.
//!
//! - [`MockHttpClient`] - scripted HTTP outcomes with request recording

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
