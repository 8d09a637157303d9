//! Platform adapters for native hosts.
//!
//! A native process has no Network Information API or media queries. These
//! adapters answer from explicit configuration (CLI flags, environment) and
//! from what the OS reports, leaving everything else unknown.

use crate::traits::{DeviceProbe, NetworkInformation};

/// Connection signals fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticNetwork {
    effective_type: Option<String>,
    save_data: bool,
}

impl StaticNetwork {
    pub fn new(effective_type: Option<String>, save_data: bool) -> Self {
        Self {
            effective_type,
            save_data,
        }
    }
}

impl NetworkInformation for StaticNetwork {
    fn effective_type(&self) -> Option<String> {
        self.effective_type.clone()
    }

    fn save_data(&self) -> bool {
        self.save_data
    }

    fn is_online(&self) -> bool {
        self.effective_type.as_deref() != Some("offline")
    }
}

/// Device probe backed by the OS processor count plus configured overrides.
#[derive(Debug, Clone, Default)]
pub struct NativeDeviceProbe {
    memory_gb: Option<f32>,
    viewport_width: Option<u32>,
    reduced_motion: Option<bool>,
    cores_override: Option<u32>,
}

impl NativeDeviceProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_memory_gb(mut self, memory_gb: f32) -> Self {
        self.memory_gb = Some(memory_gb);
        self
    }

    pub fn with_viewport_width(mut self, width: u32) -> Self {
        self.viewport_width = Some(width);
        self
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = Some(reduced);
        self
    }

    /// Report `cores` instead of the OS value.
    pub fn with_cores(mut self, cores: u32) -> Self {
        self.cores_override = Some(cores);
        self
    }
}

impl DeviceProbe for NativeDeviceProbe {
    fn hardware_concurrency(&self) -> Option<u32> {
        self.cores_override.or_else(|| {
            std::thread::available_parallelism()
                .ok()
                .map(|n| n.get() as u32)
        })
    }

    fn device_memory_gb(&self) -> Option<f32> {
        self.memory_gb
    }

    fn viewport_width(&self) -> Option<u32> {
        self.viewport_width
    }

    fn prefers_reduced_motion(&self) -> Option<bool> {
        self.reduced_motion
    }
}
