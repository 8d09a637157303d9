//! Mock platform signals for testing.
//!
//! Both mocks are cheap `Clone` handles over shared state, so a test can keep
//! one copy, hand another to the [`Sensor`](crate::sensor::Sensor), and flip
//! signals mid-test before calling the sensor's change handlers.

use std::sync::{Arc, Mutex};

use crate::traits::{DeviceProbe, NetworkInformation};

#[derive(Debug, Clone)]
struct NetworkSignals {
    effective_type: Option<String>,
    save_data: bool,
    downlink_mbps: Option<f64>,
    online: bool,
}

/// Scriptable [`NetworkInformation`].
#[derive(Debug, Clone)]
pub struct MockNetwork {
    signals: Arc<Mutex<NetworkSignals>>,
}

impl MockNetwork {
    /// Online network reporting the given effective type.
    pub fn new(effective_type: &str) -> Self {
        Self {
            signals: Arc::new(Mutex::new(NetworkSignals {
                effective_type: Some(effective_type.to_string()),
                save_data: false,
                downlink_mbps: None,
                online: true,
            })),
        }
    }

    pub fn set_effective_type(&self, effective_type: Option<&str>) {
        self.signals.lock().unwrap().effective_type = effective_type.map(str::to_string);
    }

    pub fn set_save_data(&self, save_data: bool) {
        self.signals.lock().unwrap().save_data = save_data;
    }

    pub fn set_downlink(&self, mbps: Option<f64>) {
        self.signals.lock().unwrap().downlink_mbps = mbps;
    }

    pub fn set_online(&self, online: bool) {
        self.signals.lock().unwrap().online = online;
    }
}

impl NetworkInformation for MockNetwork {
    fn effective_type(&self) -> Option<String> {
        self.signals.lock().unwrap().effective_type.clone()
    }

    fn save_data(&self) -> bool {
        self.signals.lock().unwrap().save_data
    }

    fn downlink_mbps(&self) -> Option<f64> {
        self.signals.lock().unwrap().downlink_mbps
    }

    fn is_online(&self) -> bool {
        self.signals.lock().unwrap().online
    }
}

#[derive(Debug, Clone, Default)]
struct DeviceSignals {
    cores: Option<u32>,
    memory_gb: Option<f32>,
    viewport_width: Option<u32>,
    reduced_motion: Option<bool>,
    dark: Option<bool>,
}

/// Scriptable [`DeviceProbe`]. Every signal starts unknown.
#[derive(Debug, Clone, Default)]
pub struct MockDevice {
    signals: Arc<Mutex<DeviceSignals>>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hardware(self, cores: u32, memory_gb: f32) -> Self {
        {
            let mut signals = self.signals.lock().unwrap();
            signals.cores = Some(cores);
            signals.memory_gb = Some(memory_gb);
        }
        self
    }

    pub fn with_viewport_width(self, width: u32) -> Self {
        self.set_viewport_width(width);
        self
    }

    pub fn set_viewport_width(&self, width: u32) {
        self.signals.lock().unwrap().viewport_width = Some(width);
    }

    pub fn set_reduced_motion(&self, reduced: bool) {
        self.signals.lock().unwrap().reduced_motion = Some(reduced);
    }

    pub fn set_dark(&self, dark: bool) {
        self.signals.lock().unwrap().dark = Some(dark);
    }
}

impl DeviceProbe for MockDevice {
    fn hardware_concurrency(&self) -> Option<u32> {
        self.signals.lock().unwrap().cores
    }

    fn device_memory_gb(&self) -> Option<f32> {
        self.signals.lock().unwrap().memory_gb
    }

    fn viewport_width(&self) -> Option<u32> {
        self.signals.lock().unwrap().viewport_width
    }

    fn prefers_reduced_motion(&self) -> Option<bool> {
        self.signals.lock().unwrap().reduced_motion
    }

    fn prefers_dark(&self) -> Option<bool> {
        self.signals.lock().unwrap().dark
    }
}
