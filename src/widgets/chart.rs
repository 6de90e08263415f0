// Charts hold lazy signals; values are only computed when rendered against a context.

use serde::Serialize;

use crate::timeseries::{Context, NamedSeries, TimeSeries, Timestamp};

#[derive(Debug, Clone)]
pub struct Chart {
    pub title: String,
    pub series: Vec<NamedSeries>,
    pub stacked: bool,
}

impl Chart {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            series: Vec::new(),
            stacked: false,
        }
    }

    pub fn add_series(&mut self, name: impl Into<String>, series: TimeSeries) -> &mut Self {
        self.series.push(NamedSeries::new(name, series));
        self
    }

    pub fn add_many(&mut self, series: impl IntoIterator<Item = NamedSeries>) -> &mut Self {
        self.series.extend(series);
        self
    }

    pub fn stacked(&mut self) -> &mut Self {
        self.stacked = true;
        self
    }

    pub fn render(&self, ctx: &Context) -> RenderedChart {
        RenderedChart {
            title: self.title.clone(),
            ctx: *ctx,
            stacked: self.stacked,
            series: self
                .series
                .iter()
                .map(|s| RenderedSeries {
                    name: s.name.clone(),
                    data: s.series.values(ctx),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedSeries {
    pub name: String,
    pub data: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedChart {
    pub title: String,
    pub ctx: Context,
    pub stacked: bool,
    pub series: Vec<RenderedSeries>,
}

impl RenderedChart {
    pub fn timestamps(&self) -> Vec<Timestamp> {
        self.ctx.buckets().collect()
    }
}
