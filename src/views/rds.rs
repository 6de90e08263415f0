// Managed-database dashboard: instance status table and log message rates.

use crate::model::{Application, Status};
use crate::timeseries::{AggregatedTimeseries, Context, nan_sum};
use crate::widgets::{Dashboard, TableCell};

pub fn rds(ctx: &Context, app: &Application) -> Dashboard {
    let mut dash = Dashboard::new("RDS");

    for instance in app.instances.values() {
        let Some(rds) = &instance.rds else {
            continue;
        };

        let alive = rds
            .life_span
            .get()
            .and_then(|ts| ts.last(ctx))
            .is_some_and(|v| v > 0.0);
        let status = match rds.status.value() {
            // no status known: either the series is gone or it never carried a status label
            s if !alive || s.is_empty() => {
                TableCell::default().set_status(Status::Warning, "down (no metrics)")
            }
            "available" => TableCell::default().set_status(Status::Ok, "available"),
            other => TableCell::default().set_status(Status::Warning, other),
        };
        let engine = format!("{} {}", rds.engine.value(), rds.engine_version.value());
        let multi_az = if rds.is_multi_az() { "yes" } else { "no" };

        dash.get_or_create_table("Instances", &["Instance", "Status", "Multi-AZ"])
            .add_row(vec![
                TableCell::new(&instance.name).add_tag(engine.trim()),
                status,
                TableCell::new(multi_az),
            ]);

        let mut total = AggregatedTimeseries::new(nan_sum);
        for messages in instance.log_messages.values() {
            if let Some(ts) = messages.get() {
                total.add_input(ts);
            }
        }
        if !total.is_empty() {
            dash.get_or_create_chart("Log messages, per interval")
                .add_series(&instance.name, total.into());
        }
    }
    dash
}
