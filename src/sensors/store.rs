// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Sensor aggregate store - the single writer of network state

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::{LogAggregate, Measurement, SensorId, SensorState, Severity};

/// Per-sensor state for every sensor seen this session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkState {
    pub sensors: BTreeMap<SensorId, SensorState>,
}

impl NetworkState {
    pub fn get(&self, sensor_id: &SensorId) -> Option<&SensorState> {
        self.sensors.get(sensor_id)
    }
}

/// Result of folding a measurement into the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementOutcome {
    Inserted,
    /// A measurement with the same timestamp was already stored; first write wins
    Duplicate,
}

/// Result of folding a log event into the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOutcome {
    pub created: bool,
    pub occurrence_count: u64,
    pub severity: Severity,
}

/// Owns the [`NetworkState`] and is the only place it is mutated
#[derive(Debug, Default)]
pub struct NetworkStore {
    state: NetworkState,
}

impl NetworkStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sensor_mut(&mut self, sensor_id: &SensorId) -> &mut SensorState {
        self.state
            .sensors
            .entry(sensor_id.clone())
            .or_insert_with(|| SensorState::new(sensor_id.clone()))
    }

    pub fn ingest_measurement(
        &mut self,
        sensor_id: SensorId,
        timestamp: u64,
        payload: Map<String, Value>,
    ) -> MeasurementOutcome {
        let sensor = self.sensor_mut(&sensor_id);
        match sensor.data.entry(timestamp) {
            Entry::Occupied(_) => {
                debug!("Dropping duplicate measurement {}@{}", sensor_id, timestamp);
                MeasurementOutcome::Duplicate
            }
            Entry::Vacant(slot) => {
                slot.insert(Measurement::new(sensor_id, timestamp, payload));
                MeasurementOutcome::Inserted
            }
        }
    }

    pub fn ingest_log_event(
        &mut self,
        sensor_id: SensorId,
        subject: String,
        severity: Severity,
        timestamp: u64,
    ) -> LogOutcome {
        let sensor = self.sensor_mut(&sensor_id);
        match sensor.logs.entry(subject) {
            Entry::Occupied(mut slot) => {
                let log = slot.get_mut();
                log.record(severity, timestamp);
                LogOutcome {
                    created: false,
                    occurrence_count: log.occurrence_count,
                    severity: log.severity,
                }
            }
            Entry::Vacant(slot) => {
                let subject = slot.key().clone();
                slot.insert(LogAggregate::new(sensor_id, subject, severity, timestamp));
                LogOutcome {
                    created: true,
                    occurrence_count: 1,
                    severity,
                }
            }
        }
    }

    /// `None` means the sensor never reported anything.
    pub fn get_sensor_state(&self, sensor_id: &SensorId) -> Option<&SensorState> {
        self.state.get(sensor_id)
    }

    pub fn list_known_sensors(&self) -> BTreeSet<SensorId> {
        self.state.sensors.keys().cloned().collect()
    }

    pub fn state(&self) -> &NetworkState {
        &self.state
    }

    /// Copy of the current state for readers that must not hold the writer.
    pub fn snapshot(&self) -> NetworkState {
        self.state.clone()
    }
}
