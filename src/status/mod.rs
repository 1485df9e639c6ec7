// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Status module - sensor health derivation

mod policy;

pub use policy::{age_between, classify_age, Freshness, StalenessPolicy, DEFAULT_STALE_AFTER_SECS};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sensors::{SensorState, Severity};

/// Derived health of a sensor. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    Unknown,
    Ok,
    Warning,
    Error,
    Stale,
}

/// Indicator color class a view layer renders for a status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Success,
    Caution,
    Danger,
    Muted,
    Neutral,
}

impl SensorStatus {
    pub fn color(self) -> StatusColor {
        match self {
            SensorStatus::Ok => StatusColor::Success,
            SensorStatus::Warning => StatusColor::Caution,
            SensorStatus::Error => StatusColor::Danger,
            SensorStatus::Stale => StatusColor::Muted,
            SensorStatus::Unknown => StatusColor::Neutral,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SensorStatus::Unknown => "unknown",
            SensorStatus::Ok => "ok",
            SensorStatus::Warning => "warning",
            SensorStatus::Error => "error",
            SensorStatus::Stale => "stale",
        }
    }
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive a sensor's health at `now`.
///
/// Freshness dominates severity: stale data is reported as `stale` no
/// matter what the logs say. A sensor with only logs goes stale once its
/// newest log does. Error-level rollups that have not recurred within the
/// staleness window only count as warnings.
pub fn derive_status(
    sensor_state: Option<&SensorState>,
    now: u64,
    policy: &StalenessPolicy,
) -> SensorStatus {
    let state = match sensor_state {
        Some(state) if !state.is_empty() => state,
        _ => return SensorStatus::Unknown,
    };

    let newest_activity = match state.last_data_timestamp() {
        Some(last_data) => last_data,
        // non-empty, so logs exist
        None => state.last_log_timestamp().unwrap_or(0),
    };
    if policy.classify_timestamp(newest_activity, now) == Freshness::Stale {
        return SensorStatus::Stale;
    }

    let worst = state
        .logs
        .values()
        .map(|log| match log.severity {
            Severity::Error
                if policy.classify_timestamp(log.max_creation_timestamp, now)
                    == Freshness::Stale =>
            {
                Severity::Warning
            }
            severity => severity,
        })
        .max();

    match worst {
        Some(Severity::Error) => SensorStatus::Error,
        Some(Severity::Warning) => SensorStatus::Warning,
        _ => SensorStatus::Ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::NetworkStore;
    use serde_json::Map;

    const NOW: u64 = 1_700_000_000;

    fn policy() -> StalenessPolicy {
        StalenessPolicy::new(300)
    }

    #[test]
    fn test_never_ingested_is_unknown() {
        let store = NetworkStore::new();
        let status = derive_status(store.get_sensor_state(&"ghost".into()), NOW, &policy());
        assert_eq!(status, SensorStatus::Unknown);
    }

    #[test]
    fn test_state_without_data_or_logs_is_unknown() {
        let state = SensorState::new("s1".into());
        assert_eq!(derive_status(Some(&state), NOW, &policy()), SensorStatus::Unknown);
    }

    #[test]
    fn test_fresh_data_no_logs_is_ok() {
        let mut store = NetworkStore::new();
        store.ingest_measurement("s1".into(), NOW - 10, Map::new());
        let status = derive_status(store.get_sensor_state(&"s1".into()), NOW, &policy());
        assert_eq!(status, SensorStatus::Ok);
    }

    #[test]
    fn test_fresh_data_with_error_then_warning() {
        let mut store = NetworkStore::new();
        store.ingest_measurement("s1".into(), NOW - 10, Map::new());
        store.ingest_log_event("s1".into(), "co2 sensor".into(), Severity::Error, NOW - 5);
        let status = derive_status(store.get_sensor_state(&"s1".into()), NOW, &policy());
        assert_eq!(status, SensorStatus::Error);

        let mut store = NetworkStore::new();
        store.ingest_measurement("s1".into(), NOW - 10, Map::new());
        store.ingest_log_event("s1".into(), "co2 sensor".into(), Severity::Warning, NOW - 5);
        let status = derive_status(store.get_sensor_state(&"s1".into()), NOW, &policy());
        assert_eq!(status, SensorStatus::Warning);
    }

    #[test]
    fn test_info_logs_are_ok() {
        let mut store = NetworkStore::new();
        store.ingest_measurement("s1".into(), NOW, Map::new());
        store.ingest_log_event("s1".into(), "boot".into(), Severity::Info, NOW);
        let status = derive_status(store.get_sensor_state(&"s1".into()), NOW, &policy());
        assert_eq!(status, SensorStatus::Ok);
    }

    #[test]
    fn test_stale_data_wins_over_any_severity() {
        for severity in [Severity::Info, Severity::Warning, Severity::Error] {
            let mut store = NetworkStore::new();
            store.ingest_measurement("s1".into(), NOW - 3_600, Map::new());
            store.ingest_log_event("s1".into(), "heater".into(), severity, NOW);
            let status = derive_status(store.get_sensor_state(&"s1".into()), NOW, &policy());
            assert_eq!(status, SensorStatus::Stale);
        }
    }

    #[test]
    fn test_error_wins_over_warning() {
        let mut store = NetworkStore::new();
        store.ingest_measurement("s1".into(), NOW, Map::new());
        store.ingest_log_event("s1".into(), "ups".into(), Severity::Warning, NOW);
        store.ingest_log_event("s1".into(), "wind".into(), Severity::Error, NOW - 60);
        let status = derive_status(store.get_sensor_state(&"s1".into()), NOW, &policy());
        assert_eq!(status, SensorStatus::Error);
    }

    #[test]
    fn test_old_error_counts_as_warning() {
        let mut store = NetworkStore::new();
        store.ingest_measurement("s1".into(), NOW, Map::new());
        store.ingest_log_event("s1".into(), "wind".into(), Severity::Error, NOW - 3_600);
        let status = derive_status(store.get_sensor_state(&"s1".into()), NOW, &policy());
        assert_eq!(status, SensorStatus::Warning);
    }

    #[test]
    fn test_log_only_sensor() {
        let mut store = NetworkStore::new();
        store.ingest_log_event("s1".into(), "boot".into(), Severity::Warning, NOW - 30);
        let fresh = derive_status(store.get_sensor_state(&"s1".into()), NOW, &policy());
        assert_eq!(fresh, SensorStatus::Warning);

        let later = derive_status(store.get_sensor_state(&"s1".into()), NOW + 3_600, &policy());
        assert_eq!(later, SensorStatus::Stale);
    }

    #[test]
    fn test_future_timestamps_are_fresh() {
        let mut store = NetworkStore::new();
        store.ingest_measurement("s1".into(), NOW + 120, Map::new());
        let status = derive_status(store.get_sensor_state(&"s1".into()), NOW, &policy());
        assert_eq!(status, SensorStatus::Ok);
    }

    #[test]
    fn test_color_mapping() {
        assert_eq!(SensorStatus::Ok.color(), StatusColor::Success);
        assert_eq!(SensorStatus::Warning.color(), StatusColor::Caution);
        assert_eq!(SensorStatus::Error.color(), StatusColor::Danger);
        assert_eq!(SensorStatus::Stale.color(), StatusColor::Muted);
        assert_eq!(SensorStatus::Unknown.color(), StatusColor::Neutral);
    }
}
