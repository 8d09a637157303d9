//! Domain values observed by the sensor and consumed by the policy.
//!
//! ## Domain Objects
//!
//! - [`ConnectionSnapshot`] - connection type, data-saver flag, downlink estimate
//! - [`DeviceCapability`] - device tier, screen size, motion and color preferences

pub mod connection;
pub mod device;

pub use connection::{ConnectionSnapshot, ConnectionType};
pub use device::{ColorScheme, DeviceCapability, DeviceTier, ScreenSize};
