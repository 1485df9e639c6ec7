// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Fleet monitor - owns the aggregate store and serializes ingestion

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::{EventBus, NetworkChange};
use crate::config::Config;
use crate::ingest::{EventSource, InboundEvent};
use crate::presentation::{self, SensorSummary};
use crate::sensors::{MeasurementOutcome, NetworkState, NetworkStore, SensorCatalog, SensorId, SensorState};
use crate::status::{derive_status, SensorStatus, StalenessPolicy};

/// Counters for one ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub measurements: u64,
    pub duplicates: u64,
    pub logs: u64,
}

/// Single writer of the network state
///
/// All ingestion goes through [`Monitor::ingest`], which holds the write
/// lock for the duration of one event. Readers get copies.
pub struct Monitor {
    store: RwLock<NetworkStore>,
    catalog: SensorCatalog,
    policy: StalenessPolicy,
    event_bus: Arc<EventBus>,
}

impl Monitor {
    pub fn new(config: &Config, event_bus: Arc<EventBus>) -> Self {
        Self::with_parts(config.catalog.clone(), config.status.policy(), event_bus)
    }

    pub fn with_parts(catalog: SensorCatalog, policy: StalenessPolicy, event_bus: Arc<EventBus>) -> Self {
        Self {
            store: RwLock::new(NetworkStore::new()),
            catalog,
            policy,
            event_bus,
        }
    }

    pub fn policy(&self) -> &StalenessPolicy {
        &self.policy
    }

    pub fn catalog(&self) -> &SensorCatalog {
        &self.catalog
    }

    /// Fold one event into the state and notify subscribers.
    pub fn ingest(&self, event: InboundEvent) -> NetworkChange {
        let change = {
            let mut store = self.store.write();
            match event {
                InboundEvent::Data { sensor_id, timestamp, payload } => {
                    match store.ingest_measurement(sensor_id.clone(), timestamp, payload) {
                        MeasurementOutcome::Inserted => {
                            NetworkChange::MeasurementIngested { sensor_id, timestamp }
                        }
                        MeasurementOutcome::Duplicate => {
                            NetworkChange::DuplicateMeasurement { sensor_id, timestamp }
                        }
                    }
                }
                InboundEvent::Log { sensor_id, subject, severity, timestamp } => {
                    let outcome =
                        store.ingest_log_event(sensor_id.clone(), subject.clone(), severity, timestamp);
                    if outcome.created {
                        debug!("New log subject for {}: {}", sensor_id, subject);
                    }
                    NetworkChange::LogIngested {
                        sensor_id,
                        subject,
                        severity: outcome.severity,
                        occurrence_count: outcome.occurrence_count,
                    }
                }
            }
        };

        self.event_bus.publish(change.clone());
        change
    }

    /// Consistent copy of the whole network state.
    pub fn snapshot(&self) -> NetworkState {
        self.store.read().snapshot()
    }

    pub fn sensor_state(&self, sensor_id: &SensorId) -> Option<SensorState> {
        self.store.read().get_sensor_state(sensor_id).cloned()
    }

    /// Resolve a catalog name and return that sensor's state.
    pub fn sensor_state_by_name(&self, name: &str) -> Option<SensorState> {
        self.catalog.lookup(name).and_then(|id| self.sensor_state(id))
    }

    pub fn known_sensors(&self) -> BTreeSet<SensorId> {
        self.store.read().list_known_sensors()
    }

    pub fn sensor_status(&self, sensor_id: &SensorId, now: u64) -> SensorStatus {
        let store = self.store.read();
        derive_status(store.get_sensor_state(sensor_id), now, &self.policy)
    }

    pub fn overview(&self, now: u64) -> Vec<SensorSummary> {
        let store = self.store.read();
        presentation::overview(store.state(), &self.catalog, now, &self.policy)
    }

    /// Drain `source` into the store until it ends or shutdown is signalled.
    pub async fn run<S: EventSource + ?Sized>(
        &self,
        source: &mut S,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<RunStats> {
        info!("Starting ingestion...");
        let mut stats = RunStats::default();

        loop {
            tokio::select! {
                next = source.next_event() => {
                    match next {
                        Ok(Some(event)) => match self.ingest(event) {
                            NetworkChange::MeasurementIngested { .. } => stats.measurements += 1,
                            NetworkChange::DuplicateMeasurement { .. } => stats.duplicates += 1,
                            NetworkChange::LogIngested { .. } => stats.logs += 1,
                        },
                        Ok(None) => {
                            info!("Event source exhausted");
                            break;
                        }
                        Err(e) => {
                            warn!("Event source failed: {}", e);
                            return Err(e.into());
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("Ingestion shutting down...");
                    break;
                }
            }
        }

        info!(
            "Ingested {} measurements ({} duplicates) and {} log events",
            stats.measurements, stats.duplicates, stats.logs
        );
        Ok(stats)
    }
}
