//! Connection snapshot.
//!
//! [`ConnectionSnapshot`] is an immutable reading of the platform's network
//! signals at one point in time. The sensor replaces it wholesale on every
//! change event; no history is kept.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse network-quality classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionType {
    Offline,
    #[serde(rename = "slow-2g")]
    Slow2g,
    #[serde(rename = "2g")]
    TwoG,
    #[serde(rename = "3g")]
    ThreeG,
    #[serde(rename = "4g")]
    FourG,
    Wifi,
    Unknown,
}

impl ConnectionType {
    /// Parse a platform effective-type string. Anything unrecognized is
    /// `Unknown`, which the policy treats as the most conservative case.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "offline" | "none" => ConnectionType::Offline,
            "slow-2g" | "slow2g" => ConnectionType::Slow2g,
            "2g" => ConnectionType::TwoG,
            "3g" => ConnectionType::ThreeG,
            "4g" | "5g" => ConnectionType::FourG,
            "wifi" | "ethernet" => ConnectionType::Wifi,
            _ => ConnectionType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::Offline => "offline",
            ConnectionType::Slow2g => "slow-2g",
            ConnectionType::TwoG => "2g",
            ConnectionType::ThreeG => "3g",
            ConnectionType::FourG => "4g",
            ConnectionType::Wifi => "wifi",
            ConnectionType::Unknown => "unknown",
        }
    }

    /// Quality rank, higher is better. `Unknown` ranks with `Offline` since
    /// both get the fail-safe strategy.
    pub fn rank(&self) -> u8 {
        match self {
            ConnectionType::Offline | ConnectionType::Unknown => 0,
            ConnectionType::Slow2g => 1,
            ConnectionType::TwoG => 2,
            ConnectionType::ThreeG => 3,
            ConnectionType::FourG => 4,
            ConnectionType::Wifi => 5,
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable connection reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSnapshot {
    #[serde(rename = "type")]
    pub connection_type: ConnectionType,
    pub save_data: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downlink_mbps: Option<f64>,
}

impl Default for ConnectionSnapshot {
    /// The reading used when the platform exposes no network API.
    fn default() -> Self {
        Self {
            connection_type: ConnectionType::Unknown,
            save_data: false,
            downlink_mbps: None,
        }
    }
}

impl ConnectionSnapshot {
    pub fn new(connection_type: ConnectionType, save_data: bool) -> Self {
        Self {
            connection_type,
            save_data,
            downlink_mbps: None,
        }
    }

    pub fn with_downlink(mut self, mbps: f64) -> Self {
        self.downlink_mbps = Some(mbps);
        self
    }

    pub fn is_offline(&self) -> bool {
        self.connection_type == ConnectionType::Offline
    }

    /// Inputs that force the most conservative strategy regardless of
    /// anything else: data-saver, offline, slow-2g, or an unknown type.
    pub fn is_constrained(&self) -> bool {
        self.save_data
            || matches!(
                self.connection_type,
                ConnectionType::Offline | ConnectionType::Slow2g | ConnectionType::Unknown
            )
    }

    /// `self` is no worse than `other` on every axis.
    pub fn at_least_as_good_as(&self, other: &ConnectionSnapshot) -> bool {
        self.connection_type.rank() >= other.connection_type.rank()
            && (!self.save_data || other.save_data)
    }
}
