//! Connection and capability sensor.
//!
//! Exposes the best available read of network quality and device capability
//! as a reactive value. Readings change only when the host reports a
//! platform event through one of the `handle_*` methods; in between they
//! are static.
//!
//! Missing platform capabilities are never an error. Without a
//! [`NetworkInformation`] source the snapshot stays at
//! [`ConnectionSnapshot::default`]; without a [`DeviceProbe`] the device is
//! [`DeviceCapability::default`].

use std::sync::{Arc, Mutex, Weak};

use tokio::sync::watch;
use tracing::debug;

use crate::domain::{ConnectionSnapshot, ConnectionType, DeviceCapability};
use crate::traits::{DeviceProbe, NetworkInformation};

/// Combined reading delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub connection: ConnectionSnapshot,
    pub device: DeviceCapability,
}

type Callback = Arc<dyn Fn(&SensorReading) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    callbacks: Vec<(u64, Callback)>,
}

/// Reactive read-model over platform connection and device signals.
pub struct Sensor {
    network: Option<Arc<dyn NetworkInformation>>,
    device_probe: Option<Arc<dyn DeviceProbe>>,
    device: Mutex<DeviceCapability>,
    connection_tx: watch::Sender<ConnectionSnapshot>,
    registry: Arc<Mutex<Registry>>,
}

impl Sensor {
    /// Build a sensor and take the initial readings.
    pub fn new(
        network: Option<Arc<dyn NetworkInformation>>,
        device_probe: Option<Arc<dyn DeviceProbe>>,
    ) -> Self {
        let connection = read_connection(network.as_deref());
        let device = read_device(device_probe.as_deref());
        let (connection_tx, _) = watch::channel(connection);

        debug!(
            connection = %connection.connection_type,
            save_data = connection.save_data,
            tier = ?device.tier,
            "sensor initialized"
        );

        Self {
            network,
            device_probe,
            device: Mutex::new(device),
            connection_tx,
            registry: Arc::new(Mutex::new(Registry::default())),
        }
    }

    /// Sensor for a host with no platform APIs at all.
    pub fn unsupported() -> Self {
        Self::new(None, None)
    }

    /// Current connection snapshot. Never blocks on the platform.
    pub fn get_snapshot(&self) -> ConnectionSnapshot {
        *self.connection_tx.borrow()
    }

    /// Current device capability.
    pub fn device(&self) -> DeviceCapability {
        *self.device.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn reading(&self) -> SensorReading {
        SensorReading {
            connection: self.get_snapshot(),
            device: self.device(),
        }
    }

    /// Receiver that always holds the latest connection snapshot.
    pub fn watch(&self) -> watch::Receiver<ConnectionSnapshot> {
        self.connection_tx.subscribe()
    }

    /// Register for change notifications.
    ///
    /// The callback runs once per platform event handled by this sensor.
    /// Dropping the returned handle unsubscribes.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SensorReading) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        let id = registry.next_id;
        registry.next_id += 1;
        registry.callbacks.push((id, Arc::new(callback)));

        Subscription {
            registry: Arc::downgrade(&self.registry),
            id,
            active: true,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .callbacks
            .len()
    }

    /// The platform fired a connection `change` event.
    pub fn handle_connection_change(&self) {
        let connection = read_connection(self.network.as_deref());
        debug!(
            connection = %connection.connection_type,
            save_data = connection.save_data,
            "connection changed"
        );
        self.connection_tx.send_replace(connection);
        self.notify();
    }

    /// The viewport was resized.
    pub fn handle_resize(&self) {
        self.refresh_device();
    }

    /// A `prefers-*` media query changed.
    pub fn handle_media_change(&self) {
        self.refresh_device();
    }

    fn refresh_device(&self) {
        let device = read_device(self.device_probe.as_deref());
        *self.device.lock().unwrap_or_else(|e| e.into_inner()) = device;
        debug!(tier = ?device.tier, screen = ?device.screen_size, "device capability changed");
        self.notify();
    }

    fn notify(&self) {
        let reading = self.reading();
        // Snapshot the callbacks so one can unsubscribe from inside itself
        let callbacks: Vec<Callback> = self
            .registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .callbacks
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        for callback in callbacks {
            callback(&reading);
        }
    }
}

/// Handle for a sensor subscription. Unsubscribes on drop.
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    id: u64,
    active: bool,
}

impl Subscription {
    /// Stop receiving notifications. Safe to call any number of times, and
    /// after the sensor itself is gone.
    pub fn unsubscribe(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap_or_else(|e| e.into_inner());
            registry.callbacks.retain(|(id, _)| *id != self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

fn read_connection(network: Option<&dyn NetworkInformation>) -> ConnectionSnapshot {
    let Some(network) = network else {
        return ConnectionSnapshot::default();
    };

    let connection_type = if !network.is_online() {
        ConnectionType::Offline
    } else {
        network
            .effective_type()
            .map(|raw| ConnectionType::parse(&raw))
            .unwrap_or(ConnectionType::Unknown)
    };

    ConnectionSnapshot {
        connection_type,
        save_data: network.save_data(),
        downlink_mbps: network.downlink_mbps(),
    }
}

fn read_device(probe: Option<&dyn DeviceProbe>) -> DeviceCapability {
    probe.map(DeviceCapability::detect).unwrap_or_default()
}
