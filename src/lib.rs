// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! FleetWatch - sensor fleet monitoring core
//!
//! Folds per-sensor measurements and log events into live rollups and
//! derives a discrete health status for each sensor.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────────┐   ┌───────────────┐   ┌──────────────┐
//! │    Ingest    │ → │ Monitor (single      │ → │    Status     │ → │ Presentation │
//! │ EventSource  │   │ writer) NetworkStore │   │  derivation   │   │   adapter    │
//! └──────────────┘   └──────────────────────┘   └───────────────┘   └──────────────┘
//!                               ↓
//!                    ┌──────────────────────┐
//!                    │      Event Bus       │
//!                    └──────────────────────┘
//! ```
//!
//! Data flows one way. Nothing downstream of the store writes back.

pub mod core;
pub mod sensors;
pub mod status;
pub mod presentation;
pub mod ingest;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use config::Config;
pub use core::{EventBus, Monitor};
pub use error::{IngestError, ParseError};
pub use ingest::{decode_event, InboundEvent};
pub use sensors::{LogAggregate, Measurement, NetworkState, NetworkStore, SensorCatalog, SensorId, SensorState, Severity};
pub use status::{classify_age, derive_status, Freshness, SensorStatus, StalenessPolicy, StatusColor};

/// FleetWatch version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// FleetWatch name
pub const NAME: &str = "FleetWatch";
