// Metric sources. The real storage/query backend lives outside this crate; FileSource serves a
// JSON dump of series for local runs and tests.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::instrument;

use crate::constructor::{MetricValues, Metrics};
use crate::timeseries::{Context, TimeSeries, Timestamp};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid series {name:?}: {reason}")]
    InvalidSeries { name: String, reason: String },
}

/// Anything that can answer "all samples for this window".
pub trait MetricSource: Send + Sync + 'static {
    fn query(&self, ctx: &Context) -> impl Future<Output = anyhow::Result<Metrics>> + Send;
}

/// One series as stored in a dump file.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSeries {
    pub name: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    pub from: Timestamp,
    pub step: Timestamp,
    pub values: Vec<Option<f64>>,
}

/// Groups raw series by family name.
pub fn metrics_from_series(series: Vec<RawSeries>) -> Result<Metrics, SourceError> {
    let mut metrics = Metrics::new();
    for s in series {
        if s.step <= 0 {
            return Err(SourceError::InvalidSeries {
                name: s.name,
                reason: format!("step must be > 0, got {}", s.step),
            });
        }
        let values = TimeSeries::from_samples(s.from, s.step, s.values);
        metrics
            .entry(s.name)
            .or_default()
            .push(MetricValues::new(s.labels, values));
    }
    Ok(metrics)
}

pub fn parse_series(json: &str) -> Result<Metrics, SourceError> {
    let series: Vec<RawSeries> = serde_json::from_str(json)?;
    metrics_from_series(series)
}

/// Reads the whole file on every query; series carry their own time axis.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MetricSource for FileSource {
    #[instrument(skip_all, fields(source = "file", path = %self.path.display()))]
    async fn query(&self, _ctx: &Context) -> anyhow::Result<Metrics> {
        let s = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(SourceError::from)?;
        Ok(parse_series(&s)?)
    }
}
