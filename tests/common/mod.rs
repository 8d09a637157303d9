//! Shared fixtures for integration tests.
//!
//! ```ignore
//! mod common;
//! use common::{ScriptedPages, strategy_with_chunk};
//!
//! let pages = ScriptedPages::new(25).with_failures(2);
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use adaptive_delivery::domain::{ConnectionSnapshot, ConnectionType, DeviceCapability, DeviceTier};
use adaptive_delivery::error::{DeliveryError, NetworkError};
use adaptive_delivery::policy::{select_strategy, LoadingStrategy};

/// Online snapshot with data-saver off.
pub fn snapshot(connection_type: ConnectionType) -> ConnectionSnapshot {
    ConnectionSnapshot::new(connection_type, false)
}

/// Strategy on a fast connection and high-end device, so the chunk size is
/// exactly `chunk`.
pub fn strategy_with_chunk(chunk: usize) -> LoadingStrategy {
    select_strategy(
        &snapshot(ConnectionType::Wifi),
        &DeviceCapability::new(DeviceTier::High),
        chunk,
        None,
    )
}

/// A retryable failure.
pub fn transient_error() -> DeliveryError {
    NetworkError::Timeout {
        operation: "fetch_page".to_string(),
        duration_secs: 15,
    }
    .into()
}
