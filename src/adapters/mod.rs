//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`StaticNetwork`] - connection signals from configuration
//! - [`NativeDeviceProbe`] - device signals from the OS plus overrides
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::MockNetwork`] / [`mock::MockDevice`] - Scriptable platform signals

pub mod mock;
pub mod native;
pub mod reqwest_http;

pub use mock::{MockDevice, MockHttpClient, MockNetwork};
pub use native::{NativeDeviceProbe, StaticNetwork};
pub use reqwest_http::ReqwestHttpClient;
