//! Sensor module - data model, aggregate store, and catalog

mod types;
mod store;
mod catalog;

pub use types::{SensorId, Severity, Measurement, LogAggregate, SensorState};
pub use store::{NetworkState, NetworkStore, MeasurementOutcome, LogOutcome};
pub use catalog::{SensorCatalog, CatalogEntry};
