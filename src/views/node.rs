// Node dashboard: CPU, memory, disks and network interfaces of one host.

use std::collections::BTreeMap;

use crate::model::{Gauge, Node};
use crate::timeseries::{Context, TimeSeries, nan_sum, top};
use crate::widgets::{Dashboard, TableCell};

/// Number of CPU modes shown individually.
const TOP_CPU_MODES: usize = 5;

pub fn node(ctx: &Context, node: &Node) -> Dashboard {
    let mut dash = Dashboard::new(format!("Node {}", node.key));

    let by_mode: BTreeMap<String, TimeSeries> = node
        .cpu_usage_by_mode
        .iter()
        .filter_map(|(mode, g)| Some((mode.clone(), g.get()?.clone())))
        .collect();
    if !by_mode.is_empty() {
        dash.get_or_create_chart("CPU usage by mode, %")
            .stacked()
            .add_many(top(&by_mode, nan_sum, TOP_CPU_MODES, ctx));
    }
    if let Some(total) = node.cpu_usage_percent.get() {
        let chart = dash.get_or_create_chart("CPU usage, %");
        chart.add_series("usage", total);
        if let Some(capacity) = node.cpu_capacity.get() {
            chart.add_series("cores", capacity.clone());
        }
    }

    let memory = [
        ("total", node.memory_total_bytes.get().cloned()),
        ("cached", node.memory_cached_bytes.get().cloned()),
        ("free", node.memory_free_bytes.get().cloned()),
        ("available", node.memory_available_bytes.get()),
    ];
    for (name, ts) in memory {
        if let Some(ts) = ts {
            dash.get_or_create_chart("Memory, bytes").add_series(name, ts);
        }
    }

    for (device, disk) in &node.disks {
        dash.get_or_create_table(
            "Disks",
            &["Device", "Utilization", "Await", "Read IOPS", "Write IOPS"],
        )
        .add_row(vec![
            TableCell::new(device),
            last_cell(ctx, &disk.io_utilization_percent, "%"),
            last_cell(ctx, &disk.await_seconds, "s"),
            last_cell(ctx, &disk.read_ops, ""),
            last_cell(ctx, &disk.write_ops, ""),
        ]);
    }

    for (name, iface) in &node.net_interfaces {
        dash.get_or_create_table("Network interfaces", &["Interface", "Rx", "Tx"])
            .add_row(vec![
                TableCell::new(name),
                last_cell(ctx, &iface.rx_bytes, "B/s"),
                last_cell(ctx, &iface.tx_bytes, "B/s"),
            ]);
    }
    dash
}

fn last_cell(ctx: &Context, gauge: &Gauge, unit: &str) -> TableCell {
    match gauge.get().and_then(|ts| ts.last(ctx)) {
        Some(v) => TableCell::new(format!("{:.2}", v)).set_unit(unit),
        None => TableCell::default(),
    }
}
