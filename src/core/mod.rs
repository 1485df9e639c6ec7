//! Core module - state ownership and change notification

mod monitor;
mod event_bus;

pub use monitor::{Monitor, RunStats};
pub use event_bus::{EventBus, NetworkEvent, NetworkChange};

use chrono::Utc;

/// Current wall-clock time in seconds since the Unix epoch
pub fn unix_now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}
