// Instance volumes and their optional cloud block-storage record.

use super::attribute::Attribute;
use super::numeric::Gauge;

#[derive(Debug, Clone, Default)]
pub struct Ebs {
    pub storage_type: Attribute,
    pub provisioned_iops: Gauge,
    pub allocated_gibs: Gauge,
}

#[derive(Debug, Clone, Default)]
pub struct Volume {
    pub mount_point: String,
    pub device: Attribute,
    pub capacity_bytes: Gauge,
    pub used_bytes: Gauge,
    pub ebs: Option<Ebs>,
}
