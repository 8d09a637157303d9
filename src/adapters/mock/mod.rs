//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with fixed, queued and default responses
//! - [`MockNetwork`] - scriptable connection signals
//! - [`MockDevice`] - scriptable device and media-query signals

pub mod http;
pub mod platform;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use platform::{MockDevice, MockNetwork};
