// Shared test helpers
#![allow(dead_code)]

use std::collections::BTreeMap;

use correlator::constructor::{MetricValues, Metrics};
use correlator::model::{ApplicationId, ApplicationKind, InstanceKey, Status, Upstream, World};
use correlator::timeseries::{Context, TimeSeries};

pub const STEP: i64 = 15;

/// Four buckets: 0, 15, 30, 45.
pub fn ctx() -> Context {
    Context::new(0, 3 * STEP, STEP)
}

pub fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn sample(pairs: &[(&str, &str)], values: &[f64]) -> MetricValues {
    MetricValues::new(labels(pairs), TimeSeries::from_values(0, STEP, values))
}

pub fn push(metrics: &mut Metrics, family: &str, m: MetricValues) {
    metrics.entry(family.to_string()).or_default().push(m);
}

/// One RDS instance "orders-db" scraped by job "rds-exporter", with a realistic family mix.
pub fn rds_batch() -> Metrics {
    let id = ("rds_instance_id", "us-east-1/orders-db");
    let scrape = [("job", "rds-exporter"), ("instance", "exporter:9042")];
    let mut m = Metrics::new();
    push(
        &mut m,
        "aws_rds_info",
        sample(
            &[
                id,
                ("engine", "postgres"),
                ("engine_version", "15.4"),
                ("instance_type", "db.r6g.large"),
                ("storage_type", "gp3"),
                ("region", "us-east-1"),
                ("availability_zone", "us-east-1a"),
                ("multi_az", "true"),
                ("ipv4", "10.0.0.5"),
                ("port", "5432"),
            ],
            &[1.0, 1.0, 1.0, 1.0],
        ),
    );
    push(
        &mut m,
        "aws_rds_status",
        sample(&[id, ("status", "available")], &[1.0, 1.0, 1.0, 1.0]),
    );
    push(&mut m, "aws_rds_cpu_cores", sample(&[id], &[2.0, 2.0, 2.0, 2.0]));
    for (mode, v) in [("user", 30.0), ("system", 10.0), ("iowait", 5.0)] {
        push(
            &mut m,
            "aws_rds_cpu_usage_percent",
            sample(&[id, ("mode", mode)], &[v, v, v, v]),
        );
    }
    push(
        &mut m,
        "aws_rds_memory_total_bytes",
        sample(&[id], &[8e9, 8e9, 8e9, 8e9]),
    );
    push(
        &mut m,
        "aws_rds_memory_cached_bytes",
        sample(&[id], &[2e9, 2e9, 2e9, 2e9]),
    );
    push(
        &mut m,
        "aws_rds_memory_free_bytes",
        sample(&[id], &[1e9, 1e9, 1e9, 1e9]),
    );
    push(
        &mut m,
        "aws_rds_fs_total_bytes",
        sample(&[id], &[100e9, 100e9, 100e9, 100e9]),
    );
    push(
        &mut m,
        "aws_rds_io_util_percent",
        sample(&[id, ("device", "nvme1n1")], &[40.0, 50.0, 60.0, 70.0]),
    );
    push(
        &mut m,
        "aws_rds_io_ops_per_second",
        sample(
            &[id, ("device", "nvme1n1"), ("operation", "read")],
            &[100.0, 100.0, 100.0, 100.0],
        ),
    );
    push(
        &mut m,
        "aws_rds_log_messages_total",
        sample(
            &[id, scrape[0], scrape[1], ("level", "error")],
            &[10.0, 12.0, 15.0, 15.0],
        ),
    );
    push(
        &mut m,
        "aws_rds_net_rx_bytes_per_second",
        sample(&[id, ("interface", "eth0")], &[1e3, 2e3, 3e3, 4e3]),
    );
    push(
        &mut m,
        "up",
        sample(&[scrape[0], scrape[1]], &[1.0, 1.0, 1.0, 1.0]),
    );
    m
}

pub fn deployment(name: &str) -> ApplicationId {
    ApplicationId::new("prod", ApplicationKind::Deployment, name)
}

/// Places `name` of `app` on `node` and sets the node's location.
pub fn host(world: &mut World, app: &ApplicationId, name: &str, node: &str, az: &str) {
    let (_, n) = world.get_or_create_hosted_instance(app.clone(), name, node);
    n.cloud_provider.update_at(100, "aws");
    n.region.update_at(100, "us-east-1");
    n.availability_zone.update_at(100, az);
}

pub fn link(world: &mut World, from: &ApplicationId, name: &str, to: InstanceKey, status: Status, rtt: &[f64]) {
    world.get_or_create_instance(from.clone(), name).add_upstream(Upstream {
        remote: Some(to),
        status,
        rtt: (!rtt.is_empty()).then(|| TimeSeries::from_values(0, STEP, rtt)),
    });
}
