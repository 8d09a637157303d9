//! Image source selection with bounded fallback.
//!
//! Starts at the variant matching the strategy's image quality (or the
//! closest higher one when nothing at or below it exists) and steps
//! down one variant per decode failure, at most [`MAX_FALLBACKS`] times.
//! After that the selector reports [`ImageState::Failed`] and waits for a
//! manual [`retry`](ImageSourceSelector::retry).

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::policy::ImageQuality;

pub const MAX_FALLBACKS: u32 = 2;

/// Variants in descending fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImageVariant {
    High,
    Medium,
    Low,
    Placeholder,
}

impl ImageVariant {
    const ORDER: [ImageVariant; 4] = [
        ImageVariant::High,
        ImageVariant::Medium,
        ImageVariant::Low,
        ImageVariant::Placeholder,
    ];

    fn for_quality(quality: ImageQuality) -> Self {
        match quality {
            ImageQuality::High => ImageVariant::High,
            ImageQuality::Medium => ImageVariant::Medium,
            ImageQuality::Low => ImageVariant::Low,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// URLs for each rendition of one image. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageVariants {
    pub high: Option<String>,
    pub medium: Option<String>,
    pub low: Option<String>,
    pub placeholder: Option<String>,
}

impl ImageVariants {
    pub fn url(&self, variant: ImageVariant) -> Option<&str> {
        match variant {
            ImageVariant::High => self.high.as_deref(),
            ImageVariant::Medium => self.medium.as_deref(),
            ImageVariant::Low => self.low.as_deref(),
            ImageVariant::Placeholder => self.placeholder.as_deref(),
        }
    }

    /// First available variant at or below `from`.
    fn first_available_from(&self, from: ImageVariant) -> Option<ImageVariant> {
        ImageVariant::ORDER[from.index()..]
            .iter()
            .copied()
            .find(|v| self.url(*v).is_some())
    }

    /// Closest available variant strictly above `from`.
    fn nearest_above(&self, from: ImageVariant) -> Option<ImageVariant> {
        ImageVariant::ORDER[..from.index()]
            .iter()
            .rev()
            .copied()
            .find(|v| self.url(*v).is_some())
    }

    /// Variant to start from: the requested one or lower, else the closest
    /// higher one.
    fn starting_variant(&self, wanted: ImageVariant) -> Option<ImageVariant> {
        self.first_available_from(wanted)
            .or_else(|| self.nearest_above(wanted))
    }

    /// First available variant strictly below `from`.
    fn next_below(&self, from: ImageVariant) -> Option<ImageVariant> {
        ImageVariant::ORDER[from.index() + 1..]
            .iter()
            .copied()
            .find(|v| self.url(*v).is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone)]
pub struct ImageSourceSelector {
    variants: ImageVariants,
    current: Option<ImageVariant>,
    fallbacks: u32,
    state: ImageState,
}

impl ImageSourceSelector {
    pub fn new(variants: ImageVariants, quality: ImageQuality) -> Self {
        let current = variants.starting_variant(ImageVariant::for_quality(quality));
        let state = if current.is_some() {
            ImageState::Loading
        } else {
            ImageState::Failed
        };

        Self {
            variants,
            current,
            fallbacks: 0,
            state,
        }
    }

    /// URL to render now, `None` once failed.
    pub fn current_url(&self) -> Option<&str> {
        if self.state == ImageState::Failed {
            return None;
        }
        self.current.and_then(|v| self.variants.url(v))
    }

    pub fn current_variant(&self) -> Option<ImageVariant> {
        self.current
    }

    pub fn state(&self) -> ImageState {
        self.state
    }

    pub fn fallback_count(&self) -> u32 {
        self.fallbacks
    }

    pub fn on_load(&mut self) {
        if self.state == ImageState::Loading {
            self.state = ImageState::Loaded;
        }
    }

    pub fn on_decode_error(&mut self) {
        if self.state == ImageState::Failed {
            return;
        }

        let next = self.current.and_then(|v| self.variants.next_below(v));
        match next {
            Some(next) if self.fallbacks < MAX_FALLBACKS => {
                debug!(from = ?self.current, to = ?next, "image decode failed, falling back");
                self.current = Some(next);
                self.fallbacks += 1;
                self.state = ImageState::Loading;
            }
            _ => {
                warn!(variant = ?self.current, fallbacks = self.fallbacks, "image failed");
                self.state = ImageState::Failed;
            }
        }
    }

    /// Start over from the best available variant.
    pub fn retry(&mut self) {
        self.current = self.variants.first_available_from(ImageVariant::High);
        self.fallbacks = 0;
        self.state = if self.current.is_some() {
            ImageState::Loading
        } else {
            ImageState::Failed
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> ImageVariants {
        ImageVariants {
            high: Some("h.webp".to_string()),
            medium: Some("m.webp".to_string()),
            low: Some("l.webp".to_string()),
            placeholder: Some("p.svg".to_string()),
        }
    }

    #[test]
    fn test_starts_at_requested_quality() {
        let selector = ImageSourceSelector::new(all_variants(), ImageQuality::Medium);
        assert_eq!(selector.current_url(), Some("m.webp"));
        assert_eq!(selector.state(), ImageState::Loading);
    }

    #[test]
    fn test_only_higher_variant_is_used() {
        let variants = ImageVariants {
            high: Some("h.webp".to_string()),
            ..ImageVariants::default()
        };
        let selector = ImageSourceSelector::new(variants, ImageQuality::Low);
        assert_eq!(selector.state(), ImageState::Loading);
        assert_eq!(selector.current_url(), Some("h.webp"));
    }

    #[test]
    fn test_prefers_closest_higher_variant() {
        let variants = ImageVariants {
            high: Some("h.webp".to_string()),
            medium: Some("m.webp".to_string()),
            ..ImageVariants::default()
        };
        let mut selector = ImageSourceSelector::new(variants, ImageQuality::Low);
        assert_eq!(selector.current_variant(), Some(ImageVariant::Medium));

        selector.on_decode_error();
        assert_eq!(selector.state(), ImageState::Failed);
    }

    #[test]
    fn test_skips_missing_variant() {
        let variants = ImageVariants {
            medium: None,
            ..all_variants()
        };
        let selector = ImageSourceSelector::new(variants, ImageQuality::Medium);
        assert_eq!(selector.current_variant(), Some(ImageVariant::Low));
    }

    #[test]
    fn test_fallback_is_bounded() {
        let mut selector = ImageSourceSelector::new(all_variants(), ImageQuality::High);

        selector.on_decode_error();
        assert_eq!(selector.current_url(), Some("m.webp"));
        selector.on_decode_error();
        assert_eq!(selector.current_url(), Some("l.webp"));
        assert_eq!(selector.fallback_count(), 2);

        // Placeholder exists, but the budget is spent
        selector.on_decode_error();
        assert_eq!(selector.state(), ImageState::Failed);
        assert_eq!(selector.current_url(), None);
    }

    #[test]
    fn test_fails_when_nothing_lower() {
        let variants = ImageVariants {
            low: Some("l.webp".to_string()),
            ..ImageVariants::default()
        };
        let mut selector = ImageSourceSelector::new(variants, ImageQuality::High);
        assert_eq!(selector.current_url(), Some("l.webp"));

        selector.on_decode_error();
        assert_eq!(selector.state(), ImageState::Failed);
    }

    #[test]
    fn test_no_variants_fails_immediately() {
        let selector = ImageSourceSelector::new(ImageVariants::default(), ImageQuality::Low);
        assert_eq!(selector.state(), ImageState::Failed);
    }

    #[test]
    fn test_retry_restarts_at_top() {
        let mut selector = ImageSourceSelector::new(all_variants(), ImageQuality::Low);
        selector.on_decode_error();
        selector.on_decode_error();
        assert_eq!(selector.state(), ImageState::Failed);

        selector.retry();
        assert_eq!(selector.current_url(), Some("h.webp"));
        assert_eq!(selector.fallback_count(), 0);
        assert_eq!(selector.state(), ImageState::Loading);
    }

    #[test]
    fn test_load_after_fallback() {
        let mut selector = ImageSourceSelector::new(all_variants(), ImageQuality::High);
        selector.on_decode_error();
        selector.on_load();
        assert_eq!(selector.state(), ImageState::Loaded);
        assert_eq!(selector.current_variant(), Some(ImageVariant::Medium));
    }
}
