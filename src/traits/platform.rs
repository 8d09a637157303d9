//! Platform capability traits.
//!
//! Host environments (a browser shell, a native window, a test) expose
//! connection and device signals through these traits. Every method returns
//! `Option` or a plain default: a host that cannot answer simply says so,
//! and the sensor degrades to conservative values.

/// Network Information signals.
pub trait NetworkInformation: Send + Sync {
    /// Effective connection type as reported by the platform
    /// (`"slow-2g"`, `"2g"`, `"3g"`, `"4g"`, `"wifi"`, ...).
    fn effective_type(&self) -> Option<String>;

    /// Whether the user or browser requested reduced data usage.
    fn save_data(&self) -> bool {
        false
    }

    /// Estimated downlink bandwidth in megabits per second.
    fn downlink_mbps(&self) -> Option<f64> {
        None
    }

    /// Whether the platform currently has any connectivity.
    fn is_online(&self) -> bool {
        true
    }
}

/// Static device and media-query signals.
pub trait DeviceProbe: Send + Sync {
    /// Number of logical processors.
    fn hardware_concurrency(&self) -> Option<u32>;

    /// Approximate device memory in gigabytes.
    fn device_memory_gb(&self) -> Option<f32>;

    /// Current viewport width in CSS pixels.
    fn viewport_width(&self) -> Option<u32>;

    /// `prefers-reduced-motion: reduce`.
    fn prefers_reduced_motion(&self) -> Option<bool> {
        None
    }

    /// `prefers-color-scheme: dark`.
    fn prefers_dark(&self) -> Option<bool> {
        None
    }
}
