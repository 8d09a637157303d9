//! Common imports for dashboard code.
//!
//! ```ignore
//! use adaptive_delivery::prelude::*;
//! ```

// Readings
pub use crate::domain::{
    ColorScheme, ConnectionSnapshot, ConnectionType, DeviceCapability, DeviceTier, ScreenSize,
};
pub use crate::sensor::{Sensor, SensorReading, Subscription};

// Policy
pub use crate::policy::{
    select_strategy, strategy_for, DetailLevel, ImageQuality, LoadingStrategy, StrategyOverride,
};

// Consumers
pub use crate::cache::ResponseCache;
pub use crate::image::{ImageSourceSelector, ImageState, ImageVariant, ImageVariants};
pub use crate::progressive::{LoadState, PageFetcher, ProgressiveLoader};
pub use crate::retry::{retry_with_backoff, RetryPolicy};
pub use crate::visibility::{GatePhase, IntersectionSample, VisibilityGate};

// Errors
pub use crate::error::{DeliveryError, DeliveryResult, ErrorContext, ResultExt};
