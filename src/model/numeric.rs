// Numeric merge slots. The merge mode is fixed by the field's type, never inferred at runtime.

use std::collections::BTreeMap;

use crate::timeseries::{AggregatedTimeseries, TimeSeries, nan_sum};

/// Replace-if-absent: exactly one source is expected to populate this slot.
#[derive(Debug, Clone, Default)]
pub struct Gauge(Option<TimeSeries>);

impl Gauge {
    /// Returns false when the slot was already populated and `values` was dropped.
    pub fn merge(&mut self, values: &TimeSeries) -> bool {
        if self.0.is_some() {
            tracing::debug!(operation = "gauge_merge", "slot already populated; sample ignored");
            return false;
        }
        self.0 = Some(values.clone());
        true
    }

    pub fn get(&self) -> Option<&TimeSeries> {
        self.0.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

/// Accumulate: NaN-aware sum of every contribution. Contributions are keyed by the sample that
/// produced them, so re-delivery replaces instead of double counting and the fold order follows
/// the keys rather than arrival order.
#[derive(Debug, Clone, Default)]
pub struct Accumulator(BTreeMap<String, TimeSeries>);

impl Accumulator {
    pub fn add(&mut self, source: impl Into<String>, values: &TimeSeries) {
        self.0.insert(source.into(), values.clone());
    }

    pub fn get(&self) -> Option<TimeSeries> {
        if self.0.is_empty() {
            return None;
        }
        Some(AggregatedTimeseries::with_inputs(nan_sum, self.0.values().cloned()).into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
