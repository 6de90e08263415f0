// Consumer-facing building blocks: charts, tables and the dependency map, grouped in dashboards.

mod chart;
mod dependency_map;
mod table;

use serde::Serialize;

use crate::timeseries::Context;

pub use chart::{Chart, RenderedChart, RenderedSeries};
pub use dependency_map::{DependencyMap, DependencyMapInstance, DependencyMapLink, DependencyMapNode};
pub use table::{Table, TableCell};

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub name: String,
    pub charts: Vec<Chart>,
    pub tables: Vec<(String, Table)>,
    pub dependency_map: Option<DependencyMap>,
}

impl Dashboard {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            charts: Vec::new(),
            tables: Vec::new(),
            dependency_map: None,
        }
    }

    pub fn get_or_create_chart(&mut self, title: &str) -> &mut Chart {
        let idx = match self.charts.iter().position(|c| c.title == title) {
            Some(idx) => idx,
            None => {
                self.charts.push(Chart::new(title));
                self.charts.len() - 1
            }
        };
        &mut self.charts[idx]
    }

    pub fn get_or_create_table(&mut self, name: &str, header: &[&str]) -> &mut Table {
        let idx = match self.tables.iter().position(|(n, _)| n == name) {
            Some(idx) => idx,
            None => {
                self.tables.push((name.to_string(), Table::new(header)));
                self.tables.len() - 1
            }
        };
        &mut self.tables[idx].1
    }

    pub fn get_or_create_dependency_map(&mut self) -> &mut DependencyMap {
        self.dependency_map.get_or_insert_with(DependencyMap::default)
    }

    pub fn chart(&self, title: &str) -> Option<&Chart> {
        self.charts.iter().find(|c| c.title == title)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn render(&self, ctx: &Context) -> RenderedDashboard {
        RenderedDashboard {
            name: self.name.clone(),
            charts: self.charts.iter().map(|c| c.render(ctx)).collect(),
            tables: self
                .tables
                .iter()
                .map(|(name, table)| NamedTable {
                    name: name.clone(),
                    table: table.clone(),
                })
                .collect(),
            dependency_map: self.dependency_map.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedTable {
    pub name: String,
    #[serde(flatten)]
    pub table: Table,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDashboard {
    pub name: String,
    pub charts: Vec<RenderedChart>,
    pub tables: Vec<NamedTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency_map: Option<DependencyMap>,
}
