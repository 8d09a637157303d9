//! Device capability.
//!
//! Computed from static environment queries at mount and recomputed on
//! resize or media-query change.

use serde::{Deserialize, Serialize};

use crate::traits::DeviceProbe;

/// Coarse device performance class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    Low,
    Mid,
    High,
}

impl DeviceTier {
    /// Classify from processor count and memory. Either signal alone can
    /// demote the tier; when both are missing the device is `Mid`.
    pub fn classify(cores: Option<u32>, memory_gb: Option<f32>) -> Self {
        if cores.is_none() && memory_gb.is_none() {
            return DeviceTier::Mid;
        }

        let low = cores.is_some_and(|c| c <= 2) || memory_gb.is_some_and(|m| m <= 2.0);
        let mid = cores.is_some_and(|c| c <= 4) || memory_gb.is_some_and(|m| m <= 4.0);

        if low {
            DeviceTier::Low
        } else if mid {
            DeviceTier::Mid
        } else {
            DeviceTier::High
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(DeviceTier::Low),
            "mid" | "medium" => Some(DeviceTier::Mid),
            "high" => Some(DeviceTier::High),
            _ => None,
        }
    }
}

/// Viewport class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenSize {
    Mobile,
    Tablet,
    Desktop,
}

impl ScreenSize {
    pub const TABLET_MIN_WIDTH: u32 = 768;
    pub const DESKTOP_MIN_WIDTH: u32 = 1024;

    pub fn from_width(width: Option<u32>) -> Self {
        match width {
            Some(w) if w < Self::TABLET_MIN_WIDTH => ScreenSize::Mobile,
            Some(w) if w < Self::DESKTOP_MIN_WIDTH => ScreenSize::Tablet,
            _ => ScreenSize::Desktop,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// Immutable device capability reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCapability {
    pub tier: DeviceTier,
    pub screen_size: ScreenSize,
    pub prefers_reduced_motion: bool,
    pub color_scheme: ColorScheme,
}

impl Default for DeviceCapability {
    fn default() -> Self {
        Self {
            tier: DeviceTier::Mid,
            screen_size: ScreenSize::Desktop,
            prefers_reduced_motion: false,
            color_scheme: ColorScheme::Light,
        }
    }
}

impl DeviceCapability {
    pub fn new(tier: DeviceTier) -> Self {
        Self {
            tier,
            ..Self::default()
        }
    }

    /// Read every signal from `probe`, defaulting whatever it cannot answer.
    pub fn detect(probe: &dyn DeviceProbe) -> Self {
        let color_scheme = match probe.prefers_dark() {
            Some(true) => ColorScheme::Dark,
            _ => ColorScheme::Light,
        };

        Self {
            tier: DeviceTier::classify(probe.hardware_concurrency(), probe.device_memory_gb()),
            screen_size: ScreenSize::from_width(probe.viewport_width()),
            prefers_reduced_motion: probe.prefers_reduced_motion().unwrap_or(false),
            color_scheme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockDevice;

    #[test]
    fn test_tier_classification() {
        assert_eq!(DeviceTier::classify(Some(2), Some(8.0)), DeviceTier::Low);
        assert_eq!(DeviceTier::classify(Some(8), Some(1.0)), DeviceTier::Low);
        assert_eq!(DeviceTier::classify(Some(4), Some(8.0)), DeviceTier::Mid);
        assert_eq!(DeviceTier::classify(Some(8), Some(4.0)), DeviceTier::Mid);
        assert_eq!(DeviceTier::classify(Some(8), Some(8.0)), DeviceTier::High);
        assert_eq!(DeviceTier::classify(Some(16), None), DeviceTier::High);
        assert_eq!(DeviceTier::classify(None, Some(2.0)), DeviceTier::Low);
        assert_eq!(DeviceTier::classify(None, None), DeviceTier::Mid);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(DeviceTier::Low < DeviceTier::Mid);
        assert!(DeviceTier::Mid < DeviceTier::High);
    }

    #[test]
    fn test_screen_size_breakpoints() {
        assert_eq!(ScreenSize::from_width(Some(375)), ScreenSize::Mobile);
        assert_eq!(ScreenSize::from_width(Some(767)), ScreenSize::Mobile);
        assert_eq!(ScreenSize::from_width(Some(768)), ScreenSize::Tablet);
        assert_eq!(ScreenSize::from_width(Some(1023)), ScreenSize::Tablet);
        assert_eq!(ScreenSize::from_width(Some(1024)), ScreenSize::Desktop);
        assert_eq!(ScreenSize::from_width(None), ScreenSize::Desktop);
    }

    #[test]
    fn test_detect_from_probe() {
        let probe = MockDevice::new()
            .with_hardware(2, 2.0)
            .with_viewport_width(400);
        probe.set_reduced_motion(true);
        probe.set_dark(true);

        let device = DeviceCapability::detect(&probe);
        assert_eq!(device.tier, DeviceTier::Low);
        assert_eq!(device.screen_size, ScreenSize::Mobile);
        assert!(device.prefers_reduced_motion);
        assert_eq!(device.color_scheme, ColorScheme::Dark);
    }

    #[test]
    fn test_detect_empty_probe_uses_defaults() {
        let device = DeviceCapability::detect(&MockDevice::new());
        assert_eq!(device, DeviceCapability::default());
    }
}
