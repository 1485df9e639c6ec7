// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Sensor data model - identifiers, measurements, and log rollups

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseError;

/// Stable, externally assigned sensor key
///
/// Field devices report either a numeric or a textual id; both are kept
/// as text so `7` and `"7"` address the same sensor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SensorId(String);

impl SensorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SensorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SensorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for SensorId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for SensorId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => SensorId::from(n),
            RawId::Text(s) => SensorId::from(s),
        })
    }
}

/// Log severity, ordered `Info < Warning < Error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Position in the severity order
    pub fn rank(self) -> u8 {
        match self {
            Severity::Info => 0,
            Severity::Warning => 1,
            Severity::Error => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseError;

    /// Accepts the level names used by the field loggers, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warning),
            "error" | "critical" => Ok(Severity::Error),
            _ => Err(ParseError::Severity(s.to_string())),
        }
    }
}

/// One timestamped reading with an opaque payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub sensor_id: SensorId,
    /// Seconds since the Unix epoch
    pub creation_timestamp: u64,
    pub payload: Map<String, Value>,
}

impl Measurement {
    pub fn new(sensor_id: SensorId, creation_timestamp: u64, payload: Map<String, Value>) -> Self {
        Self {
            sensor_id,
            creation_timestamp,
            payload,
        }
    }
}

/// Rollup of every log event sharing a subject on one sensor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogAggregate {
    pub sensor_id: SensorId,
    pub subject: String,
    /// Worst severity seen so far
    pub severity: Severity,
    pub max_creation_timestamp: u64,
    pub occurrence_count: u64,
}

impl LogAggregate {
    pub fn new(sensor_id: SensorId, subject: String, severity: Severity, timestamp: u64) -> Self {
        Self {
            sensor_id,
            subject,
            severity,
            max_creation_timestamp: timestamp,
            occurrence_count: 1,
        }
    }

    /// Fold one more occurrence into the rollup.
    pub fn record(&mut self, severity: Severity, timestamp: u64) {
        self.occurrence_count += 1;
        self.max_creation_timestamp = self.max_creation_timestamp.max(timestamp);
        self.severity = self.severity.max(severity);
    }
}

/// Everything known about a single sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorState {
    pub sensor_id: SensorId,
    /// Measurements keyed by creation timestamp
    pub data: BTreeMap<u64, Measurement>,
    /// Log aggregates keyed by subject
    pub logs: BTreeMap<String, LogAggregate>,
}

impl SensorState {
    pub fn new(sensor_id: SensorId) -> Self {
        Self {
            sensor_id,
            data: BTreeMap::new(),
            logs: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.logs.is_empty()
    }

    pub fn last_data_timestamp(&self) -> Option<u64> {
        self.data.keys().next_back().copied()
    }

    pub fn last_log_timestamp(&self) -> Option<u64> {
        self.logs.values().map(|log| log.max_creation_timestamp).max()
    }

    pub fn worst_severity(&self) -> Option<Severity> {
        self.logs.values().map(|log| log.severity).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert_eq!(Severity::Info.max(Severity::Error), Severity::Error);
    }

    #[test]
    fn test_severity_parse_aliases() {
        assert_eq!("WARNING".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("debug".parse::<Severity>().unwrap(), Severity::Info);
        assert_eq!("Critical".parse::<Severity>().unwrap(), Severity::Error);
        assert!("fatal-ish".parse::<Severity>().is_err());
    }

    #[test]
    fn test_sensor_id_from_number_or_text() {
        let numeric: SensorId = serde_json::from_str("7").unwrap();
        let textual: SensorId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(numeric, textual);
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "\"7\"");
    }

    #[test]
    fn test_log_aggregate_record() {
        let mut log = LogAggregate::new("a".into(), "disk".into(), Severity::Warning, 100);
        log.record(Severity::Info, 50);
        assert_eq!(log.occurrence_count, 2);
        assert_eq!(log.max_creation_timestamp, 100);
        assert_eq!(log.severity, Severity::Warning);

        log.record(Severity::Error, 200);
        assert_eq!(log.occurrence_count, 3);
        assert_eq!(log.max_creation_timestamp, 200);
        assert_eq!(log.severity, Severity::Error);
    }

    #[test]
    fn test_state_rollups() {
        let mut state = SensorState::new("a".into());
        assert!(state.is_empty());
        assert_eq!(state.last_data_timestamp(), None);
        assert_eq!(state.worst_severity(), None);

        for t in [5, 10, 3] {
            state.data.insert(t, Measurement::new("a".into(), t, Map::new()));
        }
        assert_eq!(state.last_data_timestamp(), Some(10));
    }
}
