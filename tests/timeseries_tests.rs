// Lazy aggregation: combinators, composition, Increase gating, Top-K

use std::collections::BTreeMap;

use correlator::timeseries::{
    AggregatedTimeseries, Context, TimeSeries, div, increase, max, min, nan_sum, top,
};

mod common;
use common::{STEP, ctx};

fn series(values: &[Option<f64>]) -> TimeSeries {
    TimeSeries::from_samples(0, STEP, values.to_vec())
}

#[test]
fn nan_sum_skips_undefined_inputs() {
    let agg = AggregatedTimeseries::with_inputs(
        nan_sum,
        [None, Some(3.0), None, Some(5.0)].map(|v| series(&[v])),
    );
    let ts = agg.to_series();
    assert_eq!(ts.value_at(&ctx(), 0), Some(8.0));
}

#[test]
fn nan_sum_of_only_undefined_is_undefined() {
    let ts: TimeSeries =
        AggregatedTimeseries::with_inputs(nan_sum, [series(&[None]), series(&[None])]).into();
    assert_eq!(ts.value_at(&ctx(), 0), None);
}

#[test]
fn empty_aggregate_is_undefined() {
    let ts = AggregatedTimeseries::new(max).to_series();
    assert_eq!(ts.values(&ctx()), vec![None; 4]);
    assert_eq!(ts.last(&ctx()), None);
}

#[test]
fn div_by_zero_count_is_undefined() {
    let sum = TimeSeries::from_values(0, STEP, &[10.0, 10.0]);
    let count = TimeSeries::from_values(0, STEP, &[0.0, 4.0]);
    let avg: TimeSeries = AggregatedTimeseries::with_inputs(div, [sum, count]).into();
    assert_eq!(avg.values(&Context::new(0, STEP, STEP)), vec![None, Some(2.5)]);
}

#[test]
fn min_max_ignore_gaps() {
    let a = series(&[Some(1.0), None, Some(7.0)]);
    let b = series(&[Some(4.0), Some(2.0), None]);
    let c = Context::new(0, 2 * STEP, STEP);
    let lo: TimeSeries = AggregatedTimeseries::with_inputs(min, [a.clone(), b.clone()]).into();
    let hi: TimeSeries = AggregatedTimeseries::with_inputs(max, [a, b]).into();
    assert_eq!(lo.values(&c), vec![Some(1.0), Some(2.0), Some(7.0)]);
    assert_eq!(hi.values(&c), vec![Some(4.0), Some(2.0), Some(7.0)]);
}

#[test]
fn nested_aggregates_match_the_flat_expression() {
    let a = series(&[Some(1.0), None, Some(3.0), Some(4.0)]);
    let b = series(&[Some(10.0), Some(20.0), None, Some(40.0)]);
    let c = series(&[None, Some(200.0), Some(300.0), None]);

    let inner: TimeSeries =
        AggregatedTimeseries::with_inputs(nan_sum, [a.clone(), b.clone()]).into();
    let nested: TimeSeries = AggregatedTimeseries::with_inputs(nan_sum, [inner, c.clone()]).into();
    let flat: TimeSeries = AggregatedTimeseries::with_inputs(nan_sum, [a, b, c]).into();

    assert_eq!(nested.values(&ctx()), flat.values(&ctx()));
    assert_eq!(
        flat.values(&ctx()),
        vec![Some(11.0), Some(220.0), Some(303.0), Some(44.0)]
    );
}

#[test]
fn queries_are_repeatable_over_any_sub_range() {
    let a = series(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    let b = series(&[Some(5.0), None, Some(7.0), Some(8.0)]);
    let sum: TimeSeries = AggregatedTimeseries::with_inputs(nan_sum, [a, b]).into();

    let full = sum.values(&ctx());
    assert_eq!(full, sum.values(&ctx()));

    let tail = Context::new(2 * STEP, 3 * STEP, STEP);
    assert_eq!(sum.values(&tail), full[2..].to_vec());
    assert_eq!(sum.last(&ctx()), Some(12.0));
}

#[test]
fn derived_signals_are_lazy_snapshots_of_their_inputs() {
    let mut agg = AggregatedTimeseries::new(nan_sum);
    agg.add_input(TimeSeries::from_values(0, STEP, &[1.0]));
    let before = agg.to_series();
    agg.add_input(TimeSeries::from_values(0, STEP, &[2.0]));
    assert_eq!(before.value_at(&ctx(), 0), Some(1.0));
    assert_eq!(agg.to_series().value_at(&ctx(), 0), Some(3.0));
}

#[test]
fn increase_is_the_per_bucket_delta() {
    let counter = TimeSeries::from_values(0, STEP, &[10.0, 12.0, 15.0, 15.0]);
    let inc = increase(counter, None);
    assert_eq!(inc.values(&ctx()), vec![None, Some(2.0), Some(3.0), Some(0.0)]);
}

#[test]
fn increase_is_suppressed_while_the_source_is_down() {
    // exporter restarted between 15 and 30: counter reset, gate reports down at 15
    let counter = TimeSeries::from_values(0, STEP, &[100.0, 110.0, 3.0, 5.0]);
    let up = series(&[Some(1.0), Some(0.0), Some(1.0), Some(1.0)]);
    let inc = increase(counter, Some(up));
    assert_eq!(inc.values(&ctx()), vec![None, None, None, Some(2.0)]);
    assert!(inc.values(&ctx()).iter().flatten().all(|v| *v >= 0.0));
}

#[test]
fn increase_with_missing_gate_samples_is_undefined() {
    let counter = TimeSeries::from_values(0, STEP, &[1.0, 2.0, 3.0, 4.0]);
    let up = series(&[Some(1.0), Some(1.0), None, Some(1.0)]);
    let inc = increase(counter, Some(up));
    assert_eq!(inc.values(&ctx()), vec![None, Some(1.0), None, None]);
}

#[test]
fn top_ranks_by_window_total_highest_first() {
    let c = Context::new(0, STEP, STEP);
    let keyed: BTreeMap<String, TimeSeries> = [("a", 1.0), ("b", 5.0), ("c", 3.0)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), TimeSeries::from_values(0, STEP, &[v, v])))
        .collect();
    let picked = top(&keyed, nan_sum, 2, &c);
    let names: Vec<&str> = picked.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["b", "c"]);
    assert_eq!(picked[0].series.last(&c), Some(5.0));
}

#[test]
fn top_breaks_ties_by_key_and_ranks_empty_signals_last() {
    let c = Context::new(0, STEP, STEP);
    let mut keyed = BTreeMap::new();
    keyed.insert("z".to_string(), TimeSeries::from_values(0, STEP, &[2.0, 2.0]));
    keyed.insert("y".to_string(), TimeSeries::from_values(0, STEP, &[2.0, 2.0]));
    keyed.insert("a".to_string(), series(&[None, None]));
    let names: Vec<String> = top(&keyed, nan_sum, 5, &c)
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, ["y", "z", "a"]);
}

#[test]
fn defined_counts_present_samples() {
    let rtt_a = series(&[Some(0.1), None, Some(0.3), None]);
    let rtt_b = series(&[Some(0.2), Some(0.2), None, None]);
    let count: TimeSeries =
        AggregatedTimeseries::with_inputs(nan_sum, [rtt_a.defined(), rtt_b.defined()]).into();
    assert_eq!(
        count.values(&ctx()),
        vec![Some(2.0), Some(1.0), Some(1.0), Some(0.0)]
    );
}

#[test]
fn aligned_context_ends_on_a_step_boundary() {
    let c = Context::aligned(1_000_007, 60, 15);
    assert_eq!(c.to, 1_000_005);
    assert_eq!(c.from, 1_000_005 - 60);
    assert_eq!(c.len(), 5);
}
