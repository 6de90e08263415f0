// Builds one World per refresh cycle from a batch of metric samples.
// Each source adapter owns a table of metric families; adapters run on blocking workers
// against one shared world and only take the lock to merge a sample.

pub mod rds;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use tokio::task::JoinSet;
use tracing::{debug, instrument};

use crate::model::World;
use crate::timeseries::TimeSeries;

/// One labeled series of a metric family.
#[derive(Debug, Clone)]
pub struct MetricValues {
    pub labels: BTreeMap<String, String>,
    pub values: TimeSeries,
}

impl MetricValues {
    pub fn new(labels: BTreeMap<String, String>, values: TimeSeries) -> Self {
        Self { labels, values }
    }

    pub fn label(&self, name: &str) -> &str {
        self.labels.get(name).map(String::as_str).unwrap_or("")
    }

    /// Stable identity of this series within `family`: family name plus sorted labels.
    pub fn fingerprint(&self, family: &str) -> String {
        let mut out = String::from(family);
        out.push('{');
        for (i, (k, v)) in self.labels.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(k);
            out.push('=');
            out.push_str(v);
        }
        out.push('}');
        out
    }
}

/// A batch of samples grouped by metric family name.
pub type Metrics = HashMap<String, Vec<MetricValues>>;

/// A per-vendor source adapter.
pub trait Adapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Family-name prefix routed to this adapter.
    fn prefix(&self) -> &'static str;

    /// Merges every sample this adapter understands into `world`.
    fn load(&self, world: &Mutex<World>, metrics: &Metrics) -> anyhow::Result<()>;
}

/// Registry of adapters run for every cycle.
pub struct Constructor {
    adapters: Vec<Arc<dyn Adapter>>,
}

impl Default for Constructor {
    fn default() -> Self {
        Self::new()
    }
}

impl Constructor {
    pub fn new() -> Self {
        Self::with_adapters(vec![Arc::new(rds::RdsAdapter)])
    }

    pub fn with_adapters(adapters: Vec<Arc<dyn Adapter>>) -> Self {
        Self { adapters }
    }

    pub fn adapter_names(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Runs every adapter and returns the finished world. Either all adapters succeed and the
    /// world is returned, or the whole build fails.
    #[instrument(skip_all, fields(families = metrics.len(), adapters = self.adapters.len()))]
    pub async fn build(&self, metrics: Metrics) -> anyhow::Result<World> {
        let unclaimed = metrics
            .keys()
            .filter(|family| family.as_str() != UP_FAMILY)
            .filter(|family| !self.adapters.iter().any(|a| family.starts_with(a.prefix())))
            .count();
        if unclaimed > 0 {
            debug!(unclaimed_families = unclaimed, "families with no adapter");
        }

        let metrics = Arc::new(metrics);
        let world = Arc::new(Mutex::new(World::new()));
        let mut tasks = JoinSet::new();
        for adapter in &self.adapters {
            let adapter = adapter.clone();
            let metrics = metrics.clone();
            let world = world.clone();
            tasks.spawn_blocking(move || {
                adapter
                    .load(&world, &metrics)
                    .map_err(|e| anyhow::anyhow!("adapter {}: {}", adapter.name(), e))
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined.map_err(|e| anyhow::anyhow!("adapter task join: {}", e))??;
        }

        let world = Arc::try_unwrap(world)
            .map_err(|_| anyhow::anyhow!("world still shared after all adapters finished"))?
            .into_inner()
            .map_err(|e| anyhow::anyhow!("world lock poisoned: {}", e))?;
        debug!(
            applications = world.applications.len(),
            nodes = world.nodes.len(),
            "world built"
        );
        Ok(world)
    }
}

/// Scrape-liveness family used to gate counter increases.
pub const UP_FAMILY: &str = "up";

/// The `up` series of the scrape job that produced a sample, if any.
pub fn prometheus_job_status(metrics: &Metrics, job: &str, instance: &str) -> Option<TimeSeries> {
    metrics
        .get(UP_FAMILY)?
        .iter()
        .find(|m| m.label("job") == job && m.label("instance") == instance)
        .map(|m| m.values.clone())
}

/// Boolean label; anything unparseable reads as false.
pub(crate) fn parse_bool(s: &str) -> bool {
    matches!(s, "1" | "t" | "T" | "TRUE" | "true" | "True")
}
