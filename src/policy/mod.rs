//! Adaptive delivery policy.
//!
//! A pure mapping from the sensor's readings to a [`LoadingStrategy`].
//! Worse inputs never produce a more expensive strategy: chunk size, image
//! quality and detail level only go down (and the prefetch margin only goes
//! up) as the connection or device gets worse.

mod select;
mod strategy;

pub use select::select_strategy;
pub use strategy::{DetailLevel, ImageQuality, LoadingStrategy, StrategyOverride};

use crate::sensor::SensorReading;

/// Strategy for a combined sensor reading, without pins.
pub fn strategy_for(reading: &SensorReading, requested_page_size: usize) -> LoadingStrategy {
    select_strategy(&reading.connection, &reading.device, requested_page_size, None)
}
