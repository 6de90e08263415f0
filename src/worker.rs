// Refresh-cycle worker: query the source, build a fresh world, publish it as an immutable snapshot.
// A failed cycle is discarded; consumers keep reading the previously published snapshot.

use crate::constructor::Constructor;
use crate::model::Snapshot;
use crate::source::MetricSource;
use crate::timeseries::{Context, Timestamp};
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::time::{Duration, interval};
use tracing::{Instrument, instrument};

/// Latest published snapshot; `None` until the first cycle completes.
pub type SnapshotRx = watch::Receiver<Option<Arc<Snapshot>>>;
pub type SnapshotTx = watch::Sender<Option<Arc<Snapshot>>>;

pub fn snapshot_channel() -> (SnapshotTx, SnapshotRx) {
    watch::channel(None)
}

/// Source, constructor, output channel and shutdown for the worker.
pub struct WorkerDeps<S> {
    pub source: Arc<S>,
    pub constructor: Arc<Constructor>,
    pub tx: SnapshotTx,
    pub shutdown_rx: oneshot::Receiver<()>,
}

/// Cycle timing and logging config.
pub struct WorkerConfig {
    pub refresh_interval_secs: u64,
    pub window_secs: u64,
    pub step_secs: u64,
    /// How often to log cycle stats (real seconds).
    pub stats_log_interval_secs: u64,
}

pub fn now_secs() -> Timestamp {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as Timestamp)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        })
}

/// Runs one full cycle for `ctx`. Nothing is published here; the caller decides.
#[instrument(skip(source, constructor), fields(from = ctx.from, to = ctx.to, step = ctx.step))]
pub async fn run_cycle<S: MetricSource>(
    source: &S,
    constructor: &Constructor,
    ctx: Context,
) -> anyhow::Result<Snapshot> {
    let metrics = source.query(&ctx).await?;
    let samples: usize = metrics.values().map(Vec::len).sum();
    let world = constructor.build(metrics).await?;
    tracing::debug!(
        operation = "run_cycle",
        samples,
        applications = world.applications.len(),
        instances = world.instance_count(),
        nodes = world.nodes.len(),
        "cycle complete"
    );
    Ok(Snapshot {
        world,
        ctx,
        built_at: now_secs(),
    })
}

pub fn spawn<S: MetricSource>(deps: WorkerDeps<S>, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        source,
        constructor,
        tx,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        refresh_interval_secs,
        window_secs,
        step_secs,
        stats_log_interval_secs,
    } = config;

    let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", refresh_interval_secs);
    let run = async move {
        let mut tick = interval(Duration::from_secs(refresh_interval_secs));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut cycles_ok: u64 = 0;
        let mut cycles_failed: u64 = 0;

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let ctx = Context::aligned(now_secs(), window_secs as Timestamp, step_secs as Timestamp);
                    match run_cycle(source.as_ref(), &constructor, ctx).await {
                        Ok(snapshot) => {
                            cycles_ok += 1;
                            tx.send_replace(Some(Arc::new(snapshot)));
                        }
                        Err(e) => {
                            cycles_failed += 1;
                            tracing::warn!(
                                error = %e,
                                operation = "run_cycle",
                                "cycle failed; keeping previous snapshot"
                            );
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    let (applications, nodes) = tx
                        .borrow()
                        .as_ref()
                        .map(|s| (s.world.applications.len(), s.world.nodes.len()))
                        .unwrap_or((0, 0));
                    tracing::info!(
                        cycles_ok,
                        cycles_failed,
                        applications,
                        nodes,
                        "cycle stats"
                    );
                }
            }
        }
    };
    tokio::spawn(run.instrument(worker_span))
}
