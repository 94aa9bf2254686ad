//! Sensor snapshot mapping

use chrono::{DateTime, Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::time::Duration;

/// Named metric readings for one moment
///
/// Serializes as a plain JSON object. Non-finite readings are stored as
/// `null` so a snapshot always survives a JSON round trip unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorSnapshot(BTreeMap<String, Option<f64>>);

impl SensorSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reading; NaN and infinities become `null`
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        let value = value.is_finite().then_some(value);
        self.0.insert(key.into(), value);
    }

    /// Record a metric that exists but has no value on this host
    pub fn insert_null(&mut self, key: impl Into<String>) {
        self.0.insert(key.into(), None);
    }

    /// Record an optional reading, keeping the key either way
    pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<f64>) {
        match value {
            Some(v) => self.insert(key, v),
            None => self.insert_null(key),
        }
    }

    /// Value for `key`; `None` when the key is absent or null
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied().flatten()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Option<f64>> {
        self.0.iter()
    }

    /// Merge another snapshot in, later readings winning
    pub fn merge(&mut self, other: SensorSnapshot) {
        self.0.extend(other.0);
    }

    /// One-line human-readable summary of the readings
    ///
    /// Example: `System: CPU 12.0%, RAM 40.0% | Time: 09:05 | Audio: quiet`
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();

        if let (Some(cpu), Some(ram)) = (self.get("cpu_percent"), self.get("memory_percent")) {
            parts.push(format!("System: CPU {cpu:.1}%, RAM {ram:.1}%"));
        }

        if let Some(battery) = self.get("battery_percent") {
            let plugged = match self.get("power_plugged") {
                Some(p) if p != 0.0 => "plugged",
                _ => "battery",
            };
            parts.push(format!("Power: {battery:.0}% ({plugged})"));
        }

        if let Some(hour_of_day) = self.get("hour_of_day") {
            let hour = hour_of_day.trunc();
            let minute = ((hour_of_day - hour) * 60.0).trunc();
            parts.push(format!("Time: {:02}:{:02}", hour as u32, minute as u32));
        }

        if let Some(level) = self.get("audio_level") {
            let desc = if level < 20.0 {
                "quiet"
            } else if level < 50.0 {
                "moderate"
            } else {
                "loud"
            };
            parts.push(format!("Audio: {desc}"));
        }

        if parts.is_empty() {
            "Sensors initializing...".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

impl FromIterator<(String, Option<f64>)> for SensorSnapshot {
    fn from_iter<T: IntoIterator<Item = (String, Option<f64>)>>(iter: T) -> Self {
        let mut snapshot = Self::new();
        for (key, value) in iter {
            snapshot.insert_opt(key, value);
        }
        snapshot
    }
}

impl From<BTreeMap<String, Option<f64>>> for SensorSnapshot {
    fn from(map: BTreeMap<String, Option<f64>>) -> Self {
        map.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a SensorSnapshot {
    type Item = (&'a String, &'a Option<f64>);
    type IntoIter = btree_map::Iter<'a, String, Option<f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Time-of-day readings for `now`, given how long the sensors have run
///
/// `day_of_week` counts from Monday = 0.
pub fn temporal_readings(now: DateTime<Local>, uptime: Duration) -> SensorSnapshot {
    let mut snapshot = SensorSnapshot::new();
    snapshot.insert(
        "hour_of_day",
        now.hour() as f64 + now.minute() as f64 / 60.0,
    );
    snapshot.insert("day_of_week", now.weekday().num_days_from_monday() as f64);
    snapshot.insert("uptime_minutes", uptime.as_secs_f64() / 60.0);
    snapshot.insert("timestamp", now.timestamp_micros() as f64 / 1_000_000.0);
    snapshot
}
