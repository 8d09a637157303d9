//! Loading strategy values.

use serde::{Deserialize, Serialize};

/// Image fidelity. Ordered from cheapest to most expensive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    Low,
    Medium,
    High,
}

impl ImageQuality {
    /// Encoder quality factor requested from the image service.
    pub fn compression_quality(&self) -> f32 {
        match self {
            ImageQuality::Low => 0.6,
            ImageQuality::Medium => 0.75,
            ImageQuality::High => 0.9,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(ImageQuality::Low),
            "medium" | "mid" => Some(ImageQuality::Medium),
            "high" => Some(ImageQuality::High),
            _ => None,
        }
    }
}

/// Visualization complexity. Ordered from cheapest to most expensive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Low,
    Medium,
    High,
}

impl DetailLevel {
    /// Histogram bin count for distribution charts.
    pub fn histogram_bins(&self) -> usize {
        match self {
            DetailLevel::Low => 12,
            DetailLevel::Medium => 24,
            DetailLevel::High => 40,
        }
    }

    /// Whether the kernel-density overlay is drawn.
    pub fn shows_density_curve(&self) -> bool {
        matches!(self, DetailLevel::High)
    }

    /// Percentiles that get a labeled marker.
    pub fn labeled_percentiles(&self) -> &'static [u8] {
        match self {
            DetailLevel::Low => &[50],
            DetailLevel::Medium => &[25, 50, 75],
            DetailLevel::High => &[5, 25, 50, 75, 95],
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(DetailLevel::Low),
            "medium" | "mid" => Some(DetailLevel::Medium),
            "high" => Some(DetailLevel::High),
            _ => None,
        }
    }
}

/// How aggressively content should be fetched and rendered.
///
/// Always derived from the current readings with
/// [`select_strategy`](super::select_strategy); never cached in a
/// long-lived field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadingStrategy {
    /// Items per progressive batch.
    pub chunk_size: usize,
    pub image_quality: ImageQuality,
    /// 0.0 to 1.0, follows `image_quality`.
    pub compression_quality: f32,
    pub detail_level: DetailLevel,
    /// Root margin for visibility gates. Wider on slower pipelines so
    /// loading starts earlier.
    pub prefetch_margin_px: u32,
    pub max_animated_elements: u32,
}

/// Caller pins applied on top of the computed strategy.
///
/// Ignored entirely when the connection forces the conservative strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyOverride {
    pub chunk_size: Option<usize>,
    pub image_quality: Option<ImageQuality>,
    pub detail_level: Option<DetailLevel>,
}

impl StrategyOverride {
    pub fn is_empty(&self) -> bool {
        self.chunk_size.is_none() && self.image_quality.is_none() && self.detail_level.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_ordering() {
        assert!(ImageQuality::Low < ImageQuality::Medium);
        assert!(DetailLevel::Medium < DetailLevel::High);
    }

    #[test]
    fn test_compression_follows_quality() {
        assert!(
            ImageQuality::Low.compression_quality() < ImageQuality::Medium.compression_quality()
        );
        assert!(
            ImageQuality::Medium.compression_quality() < ImageQuality::High.compression_quality()
        );
    }

    #[test]
    fn test_detail_helpers() {
        assert_eq!(DetailLevel::Low.histogram_bins(), 12);
        assert_eq!(DetailLevel::High.histogram_bins(), 40);
        assert!(!DetailLevel::Medium.shows_density_curve());
        assert!(DetailLevel::High.shows_density_curve());
        assert_eq!(DetailLevel::Low.labeled_percentiles(), &[50]);
        assert_eq!(DetailLevel::Medium.labeled_percentiles().len(), 3);
    }

    #[test]
    fn test_parse() {
        assert_eq!(ImageQuality::parse("HIGH"), Some(ImageQuality::High));
        assert_eq!(DetailLevel::parse("mid"), Some(DetailLevel::Medium));
        assert_eq!(DetailLevel::parse("ultra"), None);
    }
}
