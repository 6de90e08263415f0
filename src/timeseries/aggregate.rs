// Combinators and derived signals. Every derived statistic (latency, throughput, top-K, ratios)
// is built from these; evaluation never fails, "no data" is represented as an undefined sample.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::{Context, TimeSeries};

/// Binary fold step: `(accumulator, next) -> accumulator'`.
pub type Combinator = fn(Option<f64>, Option<f64>) -> Option<f64>;

pub fn min(acc: Option<f64>, v: Option<f64>) -> Option<f64> {
    match (acc, v) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

pub fn max(acc: Option<f64>, v: Option<f64>) -> Option<f64> {
    match (acc, v) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Sum over defined values; undefined only when every value is undefined.
pub fn nan_sum(acc: Option<f64>, v: Option<f64>) -> Option<f64> {
    match (acc, v) {
        (Some(a), Some(b)) => Some(a + b),
        (a, None) => a,
        (None, b) => b,
    }
}

/// `a / b`; undefined when `a` is undefined or `b` is zero or undefined.
pub fn div(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) if b != 0.0 => Some(a / b),
        _ => None,
    }
}

/// 1 if defined, 0 otherwise.
pub fn defined(v: Option<f64>) -> Option<f64> {
    Some(if v.is_some() { 1.0 } else { 0.0 })
}

/// A combinator folded over a growing set of inputs. The fold is seeded with the first
/// input's value, so `Aggregate(div, a, b)` is `a / b` and `Aggregate(nan_sum, ..)` is a sum.
#[derive(Debug, Clone)]
pub struct AggregatedTimeseries {
    f: Combinator,
    inputs: Vec<TimeSeries>,
}

impl AggregatedTimeseries {
    pub fn new(f: Combinator) -> Self {
        Self {
            f,
            inputs: Vec::new(),
        }
    }

    pub fn with_inputs(f: Combinator, inputs: impl IntoIterator<Item = TimeSeries>) -> Self {
        Self {
            f,
            inputs: inputs.into_iter().collect(),
        }
    }

    pub fn add_input(&mut self, input: TimeSeries) -> &mut Self {
        self.inputs.push(input);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Freezes the current inputs into an immutable signal. Later `add_input` calls do not
    /// affect signals already handed out.
    pub fn to_series(&self) -> TimeSeries {
        TimeSeries::aggregate(self.f, self.inputs.clone())
    }
}

impl From<AggregatedTimeseries> for TimeSeries {
    fn from(a: AggregatedTimeseries) -> Self {
        TimeSeries::aggregate(a.f, a.inputs)
    }
}

/// Per-bucket increase of a cumulative counter. Buckets where `gate` reports the source as
/// down (undefined or <= 0) at the bucket or the one before it are undefined, so restarts never
/// show up as negative deltas. Without a gate the source is assumed up.
pub fn increase(counter: TimeSeries, gate: Option<TimeSeries>) -> TimeSeries {
    TimeSeries::increase(counter, gate)
}

/// A signal retagged with the key it was selected under.
#[derive(Debug, Clone)]
pub struct NamedSeries {
    pub name: String,
    pub series: TimeSeries,
}

impl NamedSeries {
    pub fn new(name: impl Into<String>, series: TimeSeries) -> Self {
        Self {
            name: name.into(),
            series,
        }
    }
}

/// Top `k` keyed signals ranked by `rank` folded over the window of `ctx`, highest first.
/// Signals with no defined data rank last; ties go to the smaller key.
pub fn top(
    keyed: &BTreeMap<String, TimeSeries>,
    rank: Combinator,
    k: usize,
    ctx: &Context,
) -> Vec<NamedSeries> {
    let mut ranked: Vec<(&String, Option<f64>, &TimeSeries)> = keyed
        .iter()
        .map(|(key, ts)| (key, ts.reduce(ctx, rank), ts))
        .collect();
    ranked.sort_by(|(ka, a, _), (kb, b, _)| {
        let by_total = match (a, b) {
            (Some(a), Some(b)) => b.partial_cmp(a).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_total.then_with(|| ka.cmp(kb))
    });
    ranked
        .into_iter()
        .take(k)
        .map(|(key, _, ts)| NamedSeries::new(key.clone(), ts.clone()))
        .collect()
}
