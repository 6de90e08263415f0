// Dependency map: walks an application's upstream links, summarizes status and round-trip time
// per destination application and emits topology edges between instance/node pairs.

use std::collections::BTreeMap;

use tracing::debug;

use crate::model::{Application, ApplicationId, Status, World};
use crate::timeseries::{AggregatedTimeseries, TimeSeries, div, max, min, nan_sum};
use crate::widgets::{
    Dashboard, DependencyMap, DependencyMapInstance, DependencyMapNode, TableCell,
};

/// Per-destination summary of every link feeding it.
#[derive(Debug, Clone)]
pub struct UpstreamSummary {
    /// Highest status observed on any link; never decreases.
    pub status: Status,
    rtt_min: AggregatedTimeseries,
    rtt_max: AggregatedTimeseries,
    rtt_sum: AggregatedTimeseries,
    rtt_count: AggregatedTimeseries,
}

impl Default for UpstreamSummary {
    fn default() -> Self {
        Self {
            status: Status::Unknown,
            rtt_min: AggregatedTimeseries::new(min),
            rtt_max: AggregatedTimeseries::new(max),
            rtt_sum: AggregatedTimeseries::new(nan_sum),
            rtt_count: AggregatedTimeseries::new(nan_sum),
        }
    }
}

impl UpstreamSummary {
    fn add_rtt(&mut self, rtt: &TimeSeries) {
        self.rtt_min.add_input(rtt.clone());
        self.rtt_max.add_input(rtt.clone());
        self.rtt_sum.add_input(rtt.clone());
        self.rtt_count.add_input(rtt.defined());
    }

    pub fn rtt_min(&self) -> TimeSeries {
        self.rtt_min.to_series()
    }

    pub fn rtt_max(&self) -> TimeSeries {
        self.rtt_max.to_series()
    }

    pub fn rtt_sum(&self) -> TimeSeries {
        self.rtt_sum.to_series()
    }

    /// Number of links with a defined RTT, per bucket.
    pub fn rtt_count(&self) -> TimeSeries {
        self.rtt_count.to_series()
    }

    /// Mean RTT over the links feeding this destination.
    pub fn rtt_avg(&self) -> TimeSeries {
        AggregatedTimeseries::with_inputs(div, [self.rtt_sum(), self.rtt_count()]).into()
    }

    pub fn has_rtt(&self) -> bool {
        !self.rtt_sum.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NetworkMap {
    pub upstreams: BTreeMap<ApplicationId, UpstreamSummary>,
    pub dependency_map: DependencyMap,
}

/// Builds the network map of `app` against a finished world. Links whose remote side cannot be
/// resolved in `world` are skipped.
pub fn build_network_map(app: &Application, world: &World) -> NetworkMap {
    let mut out = NetworkMap::default();
    let mut dangling = 0usize;

    for instance in app.instances.values() {
        for u in &instance.upstreams {
            let Some(remote_key) = &u.remote else {
                dangling += 1;
                continue;
            };
            let Some(upstream_app) = world.get_application(&remote_key.app) else {
                dangling += 1;
                continue;
            };
            let Some(remote) = upstream_app.get_instance(&remote_key.name) else {
                dangling += 1;
                continue;
            };

            let summary = out.upstreams.entry(upstream_app.id.clone()).or_default();
            summary.status = summary.status.max(u.status);
            if let Some(rtt) = &u.rtt {
                summary.add_rtt(rtt);
            }

            let mut link_status = u.status;
            if instance.is_obsolete() || remote.is_obsolete() {
                link_status = Status::Unknown;
            }

            if let (Some(sn), Some(dn)) = (world.node_of(instance), world.node_of(remote)) {
                out.dependency_map.update_link(
                    DependencyMapInstance {
                        app: instance.owner_id.clone(),
                        name: instance.name.clone(),
                        obsolete: instance.is_obsolete(),
                    },
                    DependencyMapNode::from(sn),
                    DependencyMapInstance {
                        app: remote.owner_id.clone(),
                        name: remote.name.clone(),
                        obsolete: remote.is_obsolete(),
                    },
                    DependencyMapNode::from(dn),
                    link_status,
                );
            }
        }
    }
    if dangling > 0 {
        debug!(app = %app.id, dangling, "skipped unresolved upstream links");
    }
    out
}

/// Network dashboard: RTT chart per destination application plus the dependency map.
pub fn network(app: &Application, world: &World) -> Dashboard {
    let map = build_network_map(app, world);
    let mut dash = Dashboard::new("Network");
    for (app_id, summary) in &map.upstreams {
        if !summary.has_rtt() {
            continue;
        }
        dash.get_or_create_chart(&format!(
            "Network round-trip time to {}, seconds",
            app_id.name
        ))
        .add_series("min", summary.rtt_min())
        .add_series("avg", summary.rtt_avg())
        .add_series("max", summary.rtt_max());
    }
    let status_table = dash.get_or_create_table("Upstreams", &["Application", "Status"]);
    for (app_id, summary) in &map.upstreams {
        status_table.add_row(vec![
            TableCell::new(app_id.to_string()),
            TableCell::default().set_status(summary.status, summary.status.as_str()),
        ]);
    }
    *dash.get_or_create_dependency_map() = map.dependency_map;
    dash
}
