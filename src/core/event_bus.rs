// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Event bus for state-change notifications

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::sensors::{SensorId, Severity};

/// What changed in the network state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkChange {
    MeasurementIngested { sensor_id: SensorId, timestamp: u64 },
    DuplicateMeasurement { sensor_id: SensorId, timestamp: u64 },
    LogIngested {
        sensor_id: SensorId,
        subject: String,
        severity: Severity,
        occurrence_count: u64,
    },
}

impl NetworkChange {
    pub fn sensor_id(&self) -> &SensorId {
        match self {
            NetworkChange::MeasurementIngested { sensor_id, .. }
            | NetworkChange::DuplicateMeasurement { sensor_id, .. }
            | NetworkChange::LogIngested { sensor_id, .. } => sensor_id,
        }
    }
}

/// Notification wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkEvent {
    pub id: u64,
    pub received_at: DateTime<Utc>,
    pub change: NetworkChange,
}

/// Fan-out of state changes to any number of readers
pub struct EventBus {
    event_tx: broadcast::Sender<NetworkEvent>,
    event_counter: AtomicU64,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(capacity.max(1));

        Self {
            event_tx,
            event_counter: AtomicU64::new(0),
        }
    }

    pub fn publish(&self, change: NetworkChange) {
        let id = self.event_counter.fetch_add(1, Ordering::Relaxed);
        let event = NetworkEvent {
            id,
            received_at: Utc::now(),
            change,
        };
        // no subscribers is fine
        let _ = self.event_tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NetworkEvent> {
        self.event_tx.subscribe()
    }
}
