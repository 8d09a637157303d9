//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP GET and streaming GET against the dashboard APIs
//! - [`NetworkInformation`] - connection type, data-saver and downlink signals
//! - [`DeviceProbe`] - device capability and media-query signals

pub mod http;
pub mod platform;

pub use http::{ByteStream, Headers, HttpClient, HttpError, Response};
pub use platform::{DeviceProbe, NetworkInformation};
