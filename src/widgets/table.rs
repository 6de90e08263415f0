// Tables: rows are kept sorted by their first cell.

use serde::Serialize;

use crate::model::Status;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableCell {
    pub value: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub unit: String,
}

impl TableCell {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn set_status(mut self, status: Status, msg: impl Into<String>) -> Self {
        self.status = Some(status);
        self.value = msg.into();
        self
    }

    pub fn set_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Empty tags are dropped.
    pub fn add_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !tag.is_empty() {
            self.tags.push(tag);
        }
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<TableCell>>,
}

impl Table {
    pub fn new(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, cells: Vec<TableCell>) {
        self.rows.push(cells);
        self.rows.sort_by(|a, b| first_value(a).cmp(first_value(b)));
    }
}

fn first_value(row: &[TableCell]) -> &str {
    row.first().map(|c| c.value.as_str()).unwrap_or("")
}
