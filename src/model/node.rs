// Host (physical, virtual or synthetic) with time-indexed attributes and capacity/usage signals.

use std::collections::{BTreeMap, BTreeSet};

use super::attribute::Attribute;
use super::instance::InstanceKey;
use super::numeric::{Accumulator, Gauge};

#[derive(Debug, Clone, Default)]
pub struct DiskStats {
    pub io_utilization_percent: Gauge,
    pub await_seconds: Gauge,
    pub read_ops: Gauge,
    pub write_ops: Gauge,
}

#[derive(Debug, Clone, Default)]
pub struct InterfaceStats {
    pub rx_bytes: Gauge,
    pub tx_bytes: Gauge,
}

#[derive(Debug, Clone, Default)]
pub struct Node {
    pub key: String,
    pub name: Attribute,
    pub cloud_provider: Attribute,
    pub region: Attribute,
    pub availability_zone: Attribute,
    pub instance_type: Attribute,

    pub cpu_capacity: Gauge,
    pub cpu_usage_percent: Accumulator,
    pub cpu_usage_by_mode: BTreeMap<String, Gauge>,
    pub memory_total_bytes: Gauge,
    pub memory_cached_bytes: Gauge,
    pub memory_free_bytes: Gauge,
    pub memory_available_bytes: Accumulator,

    pub disks: BTreeMap<String, DiskStats>,
    pub net_interfaces: BTreeMap<String, InterfaceStats>,

    /// Back-references to hosted instances; lookups go through the world.
    pub instances: BTreeSet<InstanceKey>,
}

impl Node {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn get_or_create_disk(&mut self, device: &str) -> &mut DiskStats {
        self.disks.entry(device.to_string()).or_default()
    }

    pub fn get_or_create_net_interface(&mut self, name: &str) -> &mut InterfaceStats {
        self.net_interfaces.entry(name.to_string()).or_default()
    }
}
