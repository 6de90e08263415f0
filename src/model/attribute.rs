// Time-indexed attribute: last non-empty value wins, but only if it is at least as recent.

use serde::Serialize;

use crate::timeseries::{TimeSeries, Timestamp};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attribute {
    value: String,
    #[serde(skip)]
    last_set_at: Option<Timestamp>,
}

impl Attribute {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn last_set_at(&self) -> Option<Timestamp> {
        self.last_set_at
    }

    /// Sets `value` stamped with the time of the last defined sample of `values`.
    /// Samples without any defined point carry no time and are ignored.
    pub fn update(&mut self, values: &TimeSeries, value: &str) {
        if let Some(ts) = values.last_timestamp() {
            self.update_at(ts, value);
        }
    }

    /// Equal timestamps resolve to the greater value so replay order never changes the outcome.
    pub fn update_at(&mut self, ts: Timestamp, value: &str) {
        if value.is_empty() {
            return;
        }
        let newer = match self.last_set_at {
            None => true,
            Some(prev) if ts > prev => true,
            Some(prev) if ts == prev => value > self.value.as_str(),
            Some(_) => false,
        };
        if newer {
            self.value = value.to_string();
            self.last_set_at = Some(ts);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn older_or_empty_values_are_ignored() {
        let mut a = Attribute::default();
        a.update_at(100, "available");
        a.update_at(90, "stopped");
        a.update_at(110, "");
        assert_eq!(a.value(), "available");
        assert_eq!(a.last_set_at(), Some(100));
        a.update_at(100, "rebooting");
        assert_eq!(a.value(), "rebooting");
        a.update_at(120, "available");
        assert_eq!(a.value(), "available");
    }
}
