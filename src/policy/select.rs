//! Strategy selection.

use tracing::trace;

use super::strategy::{DetailLevel, ImageQuality, LoadingStrategy, StrategyOverride};
use crate::domain::{ConnectionSnapshot, ConnectionType, DeviceCapability, DeviceTier};

const CONSERVATIVE_CHUNK: usize = 5;
const TWO_G_CHUNK: usize = 10;
const THREE_G_CHUNK: usize = 15;
const LOW_TIER_CHUNK: usize = 20;

const WIDE_MARGIN_PX: u32 = 400;
const MEDIUM_MARGIN_PX: u32 = 250;
const NARROW_MARGIN_PX: u32 = 100;

/// One side's opinion before combining.
#[derive(Debug, Clone, Copy)]
struct Recommendation {
    chunk_size: usize,
    image_quality: ImageQuality,
    detail_level: DetailLevel,
    prefetch_margin_px: u32,
}

impl Recommendation {
    fn conservative(requested: usize) -> Self {
        Self {
            chunk_size: CONSERVATIVE_CHUNK.min(requested),
            image_quality: ImageQuality::Low,
            detail_level: DetailLevel::Low,
            prefetch_margin_px: WIDE_MARGIN_PX,
        }
    }

    fn for_connection(connection_type: ConnectionType, requested: usize) -> Self {
        match connection_type {
            ConnectionType::TwoG => Self {
                chunk_size: TWO_G_CHUNK.min(requested),
                image_quality: ImageQuality::Low,
                detail_level: DetailLevel::Low,
                prefetch_margin_px: WIDE_MARGIN_PX,
            },
            ConnectionType::ThreeG => Self {
                chunk_size: THREE_G_CHUNK.min(requested),
                image_quality: ImageQuality::Medium,
                detail_level: DetailLevel::Medium,
                prefetch_margin_px: MEDIUM_MARGIN_PX,
            },
            ConnectionType::FourG | ConnectionType::Wifi => Self {
                chunk_size: requested,
                image_quality: ImageQuality::High,
                detail_level: DetailLevel::High,
                prefetch_margin_px: NARROW_MARGIN_PX,
            },
            ConnectionType::Offline | ConnectionType::Slow2g | ConnectionType::Unknown => {
                Self::conservative(requested)
            }
        }
    }

    fn for_device(tier: DeviceTier, requested: usize) -> Self {
        match tier {
            DeviceTier::Low => Self {
                chunk_size: LOW_TIER_CHUNK.min(requested),
                image_quality: ImageQuality::Medium,
                detail_level: DetailLevel::Low,
                prefetch_margin_px: WIDE_MARGIN_PX,
            },
            DeviceTier::Mid => Self {
                chunk_size: requested,
                image_quality: ImageQuality::High,
                detail_level: DetailLevel::High,
                prefetch_margin_px: MEDIUM_MARGIN_PX,
            },
            DeviceTier::High => Self {
                chunk_size: requested,
                image_quality: ImageQuality::High,
                detail_level: DetailLevel::High,
                prefetch_margin_px: NARROW_MARGIN_PX,
            },
        }
    }

    /// Field-wise pick of whichever side is cheaper.
    fn more_conservative(self, other: Self) -> Self {
        Self {
            chunk_size: self.chunk_size.min(other.chunk_size),
            image_quality: self.image_quality.min(other.image_quality),
            detail_level: self.detail_level.min(other.detail_level),
            prefetch_margin_px: self.prefetch_margin_px.max(other.prefetch_margin_px),
        }
    }
}

/// Map the current readings to a loading strategy.
///
/// Data-saver, offline, slow-2g and unrecognized connection types force the
/// most conservative strategy regardless of device tier, and `pins` is then
/// ignored. Otherwise the connection and device recommendations are
/// computed separately and the cheaper value of each field wins.
///
/// Total and pure: a zero `requested_page_size` is treated as 1.
pub fn select_strategy(
    connection: &ConnectionSnapshot,
    device: &DeviceCapability,
    requested_page_size: usize,
    pins: Option<&StrategyOverride>,
) -> LoadingStrategy {
    let requested = requested_page_size.max(1);

    let mut rec = if connection.is_constrained() {
        Recommendation::conservative(requested)
    } else {
        let from_connection = Recommendation::for_connection(connection.connection_type, requested);
        let from_device = Recommendation::for_device(device.tier, requested);
        let mut combined = from_connection.more_conservative(from_device);

        if let Some(pins) = pins {
            if let Some(chunk) = pins.chunk_size {
                combined.chunk_size = chunk.clamp(1, requested);
            }
            if let Some(quality) = pins.image_quality {
                combined.image_quality = quality;
            }
            if let Some(detail) = pins.detail_level {
                combined.detail_level = detail;
            }
        }
        combined
    };
    rec.chunk_size = rec.chunk_size.max(1);

    let max_animated_elements = if device.prefers_reduced_motion {
        0
    } else {
        match rec.detail_level {
            DetailLevel::Low => 2,
            DetailLevel::Medium => 6,
            DetailLevel::High => 12,
        }
    };

    let strategy = LoadingStrategy {
        chunk_size: rec.chunk_size,
        image_quality: rec.image_quality,
        compression_quality: rec.image_quality.compression_quality(),
        detail_level: rec.detail_level,
        prefetch_margin_px: rec.prefetch_margin_px,
        max_animated_elements,
    };

    trace!(
        connection = %connection.connection_type,
        save_data = connection.save_data,
        tier = ?device.tier,
        chunk_size = strategy.chunk_size,
        "strategy selected"
    );

    strategy
}
