// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Presentation adapter - read-only projections for view layers
//!
//! Nothing here mutates state. Every function is deterministic for a
//! given input and `now`.

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::sensors::{LogAggregate, Measurement, NetworkState, SensorCatalog, SensorId, SensorState, Severity};
use crate::status::{age_between, derive_status, SensorStatus, StalenessPolicy, StatusColor};

/// Shown for a missing timestamp
pub const PLACEHOLDER: &str = "-";

/// Appended to truncated subjects
pub const ELLIPSIS: &str = " ...";

/// Default subject display length
pub const DEFAULT_SUBJECT_MAX_LEN: usize = 100;

/// Measurements, newest first.
pub fn sorted_measurements(sensor_state: &SensorState) -> Vec<&Measurement> {
    sensor_state.data.values().rev().collect()
}

/// Log aggregates, most recently seen first. Equal timestamps keep subject order.
pub fn sorted_log_aggregates(sensor_state: &SensorState) -> Vec<&LogAggregate> {
    let mut logs: Vec<&LogAggregate> = sensor_state.logs.values().collect();
    logs.sort_by(|a, b| b.max_creation_timestamp.cmp(&a.max_creation_timestamp));
    logs
}

/// Elapsed time as "42s ago", "3m ago", "5h ago", "2d ago".
pub fn format_relative_time(timestamp: Option<u64>, now: u64) -> String {
    let timestamp = match timestamp {
        Some(t) => t,
        None => return PLACEHOLDER.to_string(),
    };

    let age = age_between(timestamp, now);
    match age {
        i64::MIN..=0 => "just now".to_string(),
        1..=59 => format!("{}s ago", age),
        60..=3_599 => format!("{}m ago", age / 60),
        3_600..=86_399 => format!("{}h ago", age / 3_600),
        _ => format!("{}d ago", age / 86_400),
    }
}

/// Absolute timestamp in the viewer's local zone.
pub fn format_local_time(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| Local.timestamp_opt(secs, 0).single())
        .map(|t| format!("{} (local time)", t.format("%Y-%m-%d %H:%M:%S")))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Cut `subject` to `max_length` characters, marking the cut with an ellipsis.
pub fn truncate_subject(subject: &str, max_length: usize) -> String {
    match subject.char_indices().nth(max_length) {
        Some((cut, _)) => format!("{}{}", &subject[..cut], ELLIPSIS),
        None => subject.to_string(),
    }
}

/// Indicator color for a single log rollup
pub fn severity_color(severity: Severity) -> StatusColor {
    match severity {
        Severity::Info => StatusColor::Neutral,
        Severity::Warning => StatusColor::Caution,
        Severity::Error => StatusColor::Danger,
    }
}

/// One row of the fleet overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorSummary {
    pub sensor_id: SensorId,
    pub name: Option<String>,
    pub status: SensorStatus,
    pub color: StatusColor,
    pub last_data: Option<u64>,
    pub last_log: Option<u64>,
    pub measurement_count: usize,
    pub log_subject_count: usize,
}

impl SensorSummary {
    pub fn new(
        sensor_id: SensorId,
        name: Option<String>,
        sensor_state: Option<&SensorState>,
        now: u64,
        policy: &StalenessPolicy,
    ) -> Self {
        let status = derive_status(sensor_state, now, policy);
        Self {
            sensor_id,
            name,
            status,
            color: status.color(),
            last_data: sensor_state.and_then(|s| s.last_data_timestamp()),
            last_log: sensor_state.and_then(|s| s.last_log_timestamp()),
            measurement_count: sensor_state.map_or(0, |s| s.data.len()),
            log_subject_count: sensor_state.map_or(0, |s| s.logs.len()),
        }
    }

    /// Catalog name if there is one, otherwise the raw id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.sensor_id.as_str())
    }
}

/// Summaries for catalogued sensors (catalog order) followed by
/// uncatalogued sensors that have reported (id order).
pub fn overview(
    state: &NetworkState,
    catalog: &SensorCatalog,
    now: u64,
    policy: &StalenessPolicy,
) -> Vec<SensorSummary> {
    let mut rows: Vec<SensorSummary> = catalog
        .entries()
        .iter()
        .map(|entry| {
            SensorSummary::new(
                entry.sensor_id.clone(),
                Some(entry.name.clone()),
                state.get(&entry.sensor_id),
                now,
                policy,
            )
        })
        .collect();

    rows.extend(
        state
            .sensors
            .iter()
            .filter(|(id, _)| catalog.name_of(id).is_none())
            .map(|(id, sensor)| SensorSummary::new(id.clone(), None, Some(sensor), now, policy)),
    );

    rows
}
