// Managed-database (AWS RDS) exporter adapter.
// Each instance gets a synthetic node "rds:<id>" and a single /rdsdbdata volume.

use std::sync::Mutex;

use tracing::{debug, instrument};

use super::{Adapter, MetricValues, Metrics, parse_bool, prometheus_job_status};
use crate::model::{
    ApplicationId, ApplicationKind, DiskStats, Ebs, Instance, Listen, Node, Rds, Volume, World,
};
use crate::timeseries::increase;

pub const PREFIX: &str = "aws_rds_";
const MOUNT_POINT: &str = "/rdsdbdata";

/// One sample being merged, with the batch it came from.
struct Sample<'a> {
    family: &'a str,
    m: &'a MetricValues,
    metrics: &'a Metrics,
}

/// The entities an RDS sample merges into.
struct Target<'a> {
    instance: &'a mut Instance,
    node: &'a mut Node,
}

impl Target<'_> {
    fn rds(&mut self) -> &mut Rds {
        self.instance.rds.get_or_insert_with(Rds::default)
    }

    /// RDS exposes a single logical volume, so at most one is kept per instance.
    fn volume(&mut self) -> &mut Volume {
        if self.instance.volumes.is_empty() {
            self.instance.volumes.push(Volume {
                mount_point: MOUNT_POINT.to_string(),
                ebs: Some(Ebs::default()),
                ..Default::default()
            });
        }
        &mut self.instance.volumes[0]
    }

    fn ebs(&mut self) -> &mut Ebs {
        self.volume().ebs.get_or_insert_with(Ebs::default)
    }
}

type MergeAction = fn(&mut Target<'_>, &Sample<'_>);

/// Family name -> merge action. Adding a family is one row here.
const FAMILIES: &[(&str, MergeAction)] = &[
    ("aws_rds_info", info),
    ("aws_rds_status", status),
    ("aws_rds_cpu_cores", cpu_cores),
    ("aws_rds_cpu_usage_percent", cpu_usage_percent),
    ("aws_rds_memory_total_bytes", memory_total),
    ("aws_rds_memory_cached_bytes", memory_cached),
    ("aws_rds_memory_free_bytes", memory_free),
    ("aws_rds_storage_provisioned_iops", provisioned_iops),
    ("aws_rds_allocated_storage_gibibytes", allocated_storage),
    ("aws_rds_fs_total_bytes", fs_total),
    ("aws_rds_fs_used_bytes", fs_used),
    ("aws_rds_io_await_seconds", io_await),
    ("aws_rds_io_ops_per_second", io_ops),
    ("aws_rds_io_util_percent", io_util),
    ("aws_rds_log_messages_total", log_messages),
    ("aws_rds_net_rx_bytes_per_second", net_rx),
    ("aws_rds_net_tx_bytes_per_second", net_tx),
];

pub fn families() -> impl Iterator<Item = &'static str> {
    FAMILIES.iter().map(|(name, _)| *name)
}

pub struct RdsAdapter;

impl Adapter for RdsAdapter {
    fn name(&self) -> &'static str {
        "rds"
    }

    fn prefix(&self) -> &'static str {
        PREFIX
    }

    #[instrument(skip_all, fields(adapter = "rds"))]
    fn load(&self, world: &Mutex<World>, metrics: &Metrics) -> anyhow::Result<()> {
        let mut merged = 0usize;
        let mut skipped = 0usize;
        for (family, action) in FAMILIES {
            let Some(samples) = metrics.get(*family) else {
                continue;
            };
            for m in samples {
                let Some(rds_id) = parse_rds_id(m.label("rds_instance_id")) else {
                    skipped += 1;
                    continue;
                };
                let sample = Sample {
                    family: *family,
                    m,
                    metrics,
                };
                let mut world = world
                    .lock()
                    .map_err(|e| anyhow::anyhow!("world lock poisoned: {}", e))?;
                let mut target = get_or_create_target(&mut world, rds_id, m);
                action(&mut target, &sample);
                merged += 1;
            }
        }
        debug!(merged, skipped, "rds samples merged");
        Ok(())
    }
}

/// `rds_instance_id` is "<region>/<id>"; returns the id.
fn parse_rds_id(raw: &str) -> Option<&str> {
    let (_, id) = raw.split_once('/')?;
    if id.is_empty() || id.contains('/') {
        return None;
    }
    Some(id)
}

fn get_or_create_target<'w>(world: &'w mut World, rds_id: &str, m: &MetricValues) -> Target<'w> {
    let id = ApplicationId::new("", ApplicationKind::Rds, rds_id);
    let node_key = format!("rds:{}", rds_id);
    let (instance, node) = world.get_or_create_hosted_instance(id, rds_id, &node_key);
    node.name.update(&m.values, &node_key);
    let mut target = Target { instance, node };
    target.rds();
    target.volume();
    target
}

fn info(t: &mut Target<'_>, s: &Sample<'_>) {
    let m = s.m;
    let (ip, port) = (m.label("ipv4"), m.label("port"));
    if !ip.is_empty() || !port.is_empty() {
        t.instance.tcp_listens.insert(Listen {
            ip: ip.to_string(),
            port: port.to_string(),
        });
    }
    let multi_az = parse_bool(m.label("multi_az")).to_string();
    let rds = t.rds();
    rds.engine.update(&m.values, m.label("engine"));
    rds.engine_version.update(&m.values, m.label("engine_version"));
    rds.multi_az.update(&m.values, &multi_az);
    t.ebs().storage_type.update(&m.values, m.label("storage_type"));
    t.node.instance_type.update(&m.values, m.label("instance_type"));
    t.node.cloud_provider.update(&m.values, "aws");
    t.node.region.update(&m.values, m.label("region"));
    t.node
        .availability_zone
        .update(&m.values, m.label("availability_zone"));
}

fn status(t: &mut Target<'_>, s: &Sample<'_>) {
    let rds = t.rds();
    rds.life_span.merge(&s.m.values);
    rds.status.update(&s.m.values, s.m.label("status"));
}

fn cpu_cores(t: &mut Target<'_>, s: &Sample<'_>) {
    t.node.cpu_capacity.merge(&s.m.values);
}

fn cpu_usage_percent(t: &mut Target<'_>, s: &Sample<'_>) {
    t.node
        .cpu_usage_percent
        .add(s.m.fingerprint(s.family), &s.m.values);
    t.node
        .cpu_usage_by_mode
        .entry(s.m.label("mode").to_string())
        .or_default()
        .merge(&s.m.values);
}

fn memory_total(t: &mut Target<'_>, s: &Sample<'_>) {
    t.node.memory_total_bytes.merge(&s.m.values);
}

fn memory_cached(t: &mut Target<'_>, s: &Sample<'_>) {
    t.node.memory_cached_bytes.merge(&s.m.values);
    t.node
        .memory_available_bytes
        .add(s.m.fingerprint(s.family), &s.m.values);
}

fn memory_free(t: &mut Target<'_>, s: &Sample<'_>) {
    t.node.memory_free_bytes.merge(&s.m.values);
    t.node
        .memory_available_bytes
        .add(s.m.fingerprint(s.family), &s.m.values);
}

fn provisioned_iops(t: &mut Target<'_>, s: &Sample<'_>) {
    t.ebs().provisioned_iops.merge(&s.m.values);
}

fn allocated_storage(t: &mut Target<'_>, s: &Sample<'_>) {
    t.ebs().allocated_gibs.merge(&s.m.values);
}

fn fs_total(t: &mut Target<'_>, s: &Sample<'_>) {
    t.volume().capacity_bytes.merge(&s.m.values);
}

fn fs_used(t: &mut Target<'_>, s: &Sample<'_>) {
    t.volume().used_bytes.merge(&s.m.values);
}

/// Shared part of the IO families: the volume learns its device, the node gets a disk record.
fn io_disk<'t>(t: &'t mut Target<'_>, s: &Sample<'_>) -> Option<&'t mut DiskStats> {
    let device = s.m.label("device");
    t.volume().device.update(&s.m.values, device);
    if device.is_empty() {
        return None;
    }
    Some(t.node.get_or_create_disk(device))
}

fn io_await(t: &mut Target<'_>, s: &Sample<'_>) {
    if let Some(disk) = io_disk(t, s) {
        disk.await_seconds.merge(&s.m.values);
    }
}

fn io_util(t: &mut Target<'_>, s: &Sample<'_>) {
    if let Some(disk) = io_disk(t, s) {
        disk.io_utilization_percent.merge(&s.m.values);
    }
}

fn io_ops(t: &mut Target<'_>, s: &Sample<'_>) {
    let operation = s.m.label("operation");
    if let Some(disk) = io_disk(t, s) {
        match operation {
            "read" => {
                disk.read_ops.merge(&s.m.values);
            }
            "write" => {
                disk.write_ops.merge(&s.m.values);
            }
            _ => {}
        }
    }
}

fn log_messages(t: &mut Target<'_>, s: &Sample<'_>) {
    let gate = prometheus_job_status(s.metrics, s.m.label("job"), s.m.label("instance"));
    let level = match s.m.label("level") {
        "" => "unknown",
        level => level,
    };
    t.instance
        .log_messages
        .entry(level.to_string())
        .or_default()
        .add(s.m.fingerprint(s.family), &increase(s.m.values.clone(), gate));
}

fn net_rx(t: &mut Target<'_>, s: &Sample<'_>) {
    t.node
        .get_or_create_net_interface(s.m.label("interface"))
        .rx_bytes
        .merge(&s.m.values);
}

fn net_tx(t: &mut Target<'_>, s: &Sample<'_>) {
    t.node
        .get_or_create_net_interface(s.m.label("interface"))
        .tx_bytes
        .merge(&s.m.values);
}
