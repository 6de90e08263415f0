// Numeric signals over a shared time axis. A sample is either defined (Some) or a gap (None).
// Signals are immutable and cheap to clone; derived signals are expression trees evaluated on demand.

pub mod aggregate;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use aggregate::{
    AggregatedTimeseries, Combinator, NamedSeries, defined, div, increase, max, min, nan_sum, top,
};

/// Unix time in seconds.
pub type Timestamp = i64;

/// Query window: buckets `from, from + step, ..` up to and including `to`.
/// Always passed explicitly by the caller so the same query returns the same result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub from: Timestamp,
    pub to: Timestamp,
    pub step: Timestamp,
}

impl Context {
    pub fn new(from: Timestamp, to: Timestamp, step: Timestamp) -> Self {
        Self {
            from,
            to,
            step: step.max(1),
        }
    }

    /// Window of `window` seconds ending at `now`, with the end aligned down to `step`.
    pub fn aligned(now: Timestamp, window: Timestamp, step: Timestamp) -> Self {
        let step = step.max(1);
        let to = now - now.rem_euclid(step);
        Self::new(to - window, to, step)
    }

    /// Bucket timestamps covered by this window. Stops at the last representable timestamp.
    pub fn buckets(&self) -> impl Iterator<Item = Timestamp> + use<> {
        let Context { from, to, step } = *self;
        let step = step.max(1);
        (0..)
            .map_while(move |i: i64| i.checked_mul(step).and_then(|off| from.checked_add(off)))
            .take_while(move |t| *t <= to)
    }

    pub fn len(&self) -> usize {
        if self.to < self.from {
            return 0;
        }
        let span = i128::from(self.to) - i128::from(self.from);
        usize::try_from(span / i128::from(self.step.max(1)) + 1).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Raw samples as delivered by the storage backend: `values[i]` covers `[from + i*step, from + (i+1)*step)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    pub from: Timestamp,
    pub step: Timestamp,
    pub values: Vec<Option<f64>>,
}

impl Samples {
    fn at(&self, t: Timestamp) -> Option<f64> {
        if t < self.from || self.step <= 0 {
            return None;
        }
        let idx = usize::try_from(t.checked_sub(self.from)? / self.step).ok()?;
        self.values.get(idx).copied().flatten()
    }

    fn last_timestamp(&self) -> Option<Timestamp> {
        self.values
            .iter()
            .rposition(Option::is_some)
            .map(|i| self.from + i as i64 * self.step)
    }
}

#[derive(Debug)]
enum Node {
    Samples(Samples),
    Aggregate {
        f: Combinator,
        inputs: Vec<TimeSeries>,
    },
    Map {
        f: fn(Option<f64>) -> Option<f64>,
        input: TimeSeries,
    },
    Increase {
        counter: TimeSeries,
        gate: Option<TimeSeries>,
    },
}

/// An opaque, immutable numeric signal.
#[derive(Clone)]
pub struct TimeSeries(Arc<Node>);

impl fmt::Debug for TimeSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_ref() {
            Node::Samples(s) => write!(f, "Samples(from={}, step={}, n={})", s.from, s.step, s.values.len()),
            Node::Aggregate { inputs, .. } => write!(f, "Aggregate({} inputs)", inputs.len()),
            Node::Map { input, .. } => write!(f, "Map({:?})", input),
            Node::Increase { counter, .. } => write!(f, "Increase({:?})", counter),
        }
    }
}

impl TimeSeries {
    pub fn from_samples(from: Timestamp, step: Timestamp, values: Vec<Option<f64>>) -> Self {
        Self(Arc::new(Node::Samples(Samples { from, step, values })))
    }

    /// Convenience for fully-defined data.
    pub fn from_values(from: Timestamp, step: Timestamp, values: &[f64]) -> Self {
        Self::from_samples(from, step, values.iter().copied().map(Some).collect())
    }

    pub(crate) fn aggregate(f: Combinator, inputs: Vec<TimeSeries>) -> Self {
        Self(Arc::new(Node::Aggregate { f, inputs }))
    }

    pub(crate) fn increase(counter: TimeSeries, gate: Option<TimeSeries>) -> Self {
        Self(Arc::new(Node::Increase { counter, gate }))
    }

    /// Elementwise map; the result is evaluated lazily like every other node.
    pub fn map(&self, f: fn(Option<f64>) -> Option<f64>) -> Self {
        Self(Arc::new(Node::Map {
            f,
            input: self.clone(),
        }))
    }

    /// 1 where this signal is defined, 0 where it is not.
    pub fn defined(&self) -> Self {
        self.map(defined)
    }

    /// Value at bucket `t` of `ctx`.
    pub fn value_at(&self, ctx: &Context, t: Timestamp) -> Option<f64> {
        match self.0.as_ref() {
            Node::Samples(s) => s.at(t),
            Node::Aggregate { f, inputs } => {
                let mut values = inputs.iter().map(|i| i.value_at(ctx, t));
                let first = values.next()?;
                values.fold(first, |acc, v| f(acc, v))
            }
            Node::Map { f, input } => f(input.value_at(ctx, t)),
            Node::Increase { counter, gate } => {
                let prev_t = t.checked_sub(ctx.step)?;
                let up = |at: Timestamp| match gate {
                    None => true,
                    Some(g) => g.value_at(ctx, at).is_some_and(|v| v > 0.0),
                };
                if !up(t) || !up(prev_t) {
                    return None;
                }
                let cur = counter.value_at(ctx, t)?;
                let prev = counter.value_at(ctx, prev_t)?;
                if cur < prev {
                    // counter restarted from zero while the source stayed up
                    Some(cur)
                } else {
                    Some(cur - prev)
                }
            }
        }
    }

    /// Whole-window iteration at the resolution of `ctx`.
    pub fn iter<'a>(&'a self, ctx: &'a Context) -> impl Iterator<Item = (Timestamp, Option<f64>)> + 'a {
        ctx.buckets().map(move |t| (t, self.value_at(ctx, t)))
    }

    pub fn values(&self, ctx: &Context) -> Vec<Option<f64>> {
        self.iter(ctx).map(|(_, v)| v).collect()
    }

    /// Last defined value within the window.
    pub fn last(&self, ctx: &Context) -> Option<f64> {
        self.iter(ctx).filter_map(|(_, v)| v).last()
    }

    /// Folds `f` over every bucket of the window, the same way an aggregate folds over inputs.
    pub fn reduce(&self, ctx: &Context, f: Combinator) -> Option<f64> {
        let mut values = self.iter(ctx).map(|(_, v)| v);
        let first = values.next()?;
        values.fold(first, |acc, v| f(acc, v))
    }

    /// Timestamp of the most recent defined raw sample feeding this signal.
    pub fn last_timestamp(&self) -> Option<Timestamp> {
        match self.0.as_ref() {
            Node::Samples(s) => s.last_timestamp(),
            Node::Aggregate { inputs, .. } => inputs.iter().filter_map(|i| i.last_timestamp()).max(),
            Node::Map { input, .. } => input.last_timestamp(),
            Node::Increase { counter, .. } => counter.last_timestamp(),
        }
    }
}
