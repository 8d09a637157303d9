//! Lazy visibility gate.
//!
//! Defers loading a component until it comes within `margin_px` of the
//! viewport. The transition to [`GatePhase::Visible`] happens at most once
//! per mount and is never undone; scrolling away does not unload.

use tracing::debug;

use crate::policy::LoadingStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    Unobserved,
    Observing,
    Visible,
}

/// One intersection observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionSample {
    /// Distance from the element's nearest edge to the viewport. Zero or
    /// negative means it overlaps.
    pub distance_to_viewport_px: f64,
}

impl IntersectionSample {
    pub fn at(distance_to_viewport_px: f64) -> Self {
        Self {
            distance_to_viewport_px,
        }
    }

    pub fn intersecting() -> Self {
        Self::at(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct VisibilityGate {
    phase: GatePhase,
    margin_px: u32,
    priority: bool,
    has_loaded_once: bool,
}

impl VisibilityGate {
    /// `priority` content (above the fold) skips observation entirely.
    pub fn new(margin_px: u32, priority: bool) -> Self {
        Self {
            phase: GatePhase::Unobserved,
            margin_px,
            priority,
            has_loaded_once: false,
        }
    }

    pub fn for_strategy(strategy: &LoadingStrategy, priority: bool) -> Self {
        Self::new(strategy.prefetch_margin_px, priority)
    }

    pub fn attach(&mut self) {
        if self.phase != GatePhase::Unobserved {
            return;
        }
        self.phase = if self.priority {
            GatePhase::Visible
        } else {
            GatePhase::Observing
        };
        debug!(phase = ?self.phase, margin_px = self.margin_px, "visibility gate attached");
    }

    pub fn on_intersection(&mut self, sample: IntersectionSample) {
        if self.phase != GatePhase::Observing {
            return;
        }
        if sample.distance_to_viewport_px <= f64::from(self.margin_px) {
            self.phase = GatePhase::Visible;
            debug!(
                distance = sample.distance_to_viewport_px,
                "visibility gate opened"
            );
        }
    }

    pub fn should_load(&self) -> bool {
        self.phase == GatePhase::Visible
    }

    pub fn mark_loaded(&mut self) {
        self.has_loaded_once = true;
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    pub fn is_near_viewport(&self) -> bool {
        self.should_load()
    }

    pub fn has_loaded_once(&self) -> bool {
        self.has_loaded_once
    }

    pub fn margin_px(&self) -> u32 {
        self.margin_px
    }
}
