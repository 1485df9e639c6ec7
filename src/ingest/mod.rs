// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Inbound boundary - decoded sensor events and event sources
//!
//! Events arrive already separated from whatever transport carried them.
//! The only wire concern handled here is JSON decoding of a single event.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{debug, warn};

use crate::error::IngestError;
use crate::sensors::{SensorId, Severity};

/// One event delivered by the transport layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InboundEvent {
    /// A measurement
    Data {
        sensor_id: SensorId,
        #[serde(deserialize_with = "deserialize_timestamp")]
        timestamp: u64,
        #[serde(default)]
        payload: Map<String, Value>,
    },
    /// A diagnostic log occurrence
    Log {
        sensor_id: SensorId,
        subject: String,
        #[serde(deserialize_with = "deserialize_severity")]
        severity: Severity,
        #[serde(deserialize_with = "deserialize_timestamp")]
        timestamp: u64,
    },
}

impl InboundEvent {
    pub fn sensor_id(&self) -> &SensorId {
        match self {
            InboundEvent::Data { sensor_id, .. } | InboundEvent::Log { sensor_id, .. } => sensor_id,
        }
    }

    pub fn timestamp(&self) -> u64 {
        match self {
            InboundEvent::Data { timestamp, .. } | InboundEvent::Log { timestamp, .. } => *timestamp,
        }
    }
}

/// Seconds since epoch; field loggers send fractional seconds, which are floored.
fn deserialize_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Whole(u64),
        Fractional(f64),
    }

    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Whole(secs) => Ok(secs),
        RawTimestamp::Fractional(secs) if secs.is_finite() && secs >= 0.0 && secs < u64::MAX as f64 => {
            Ok(secs.floor() as u64)
        }
        RawTimestamp::Fractional(secs) => Err(serde::de::Error::custom(format!(
            "timestamp must be a non-negative number of seconds below 2^64, got {}",
            secs
        ))),
    }
}

fn deserialize_severity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Severity, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

/// Decode a single JSON-encoded event.
pub fn decode_event(bytes: &[u8]) -> Result<InboundEvent, IngestError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Anything that yields decoded events in delivery order
#[async_trait]
pub trait EventSource: Send {
    /// Next event, or `None` once the source is exhausted
    async fn next_event(&mut self) -> Result<Option<InboundEvent>, IngestError>;
}

/// Newline-delimited JSON events
///
/// Blank lines are ignored; lines that fail to decode are logged and
/// skipped so one bad record does not stop a replay.
pub struct JsonLinesSource<R> {
    lines: Lines<R>,
    line_number: u64,
    skipped: u64,
}

impl<R: AsyncBufRead + Unpin + Send> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            skipped: 0,
        }
    }

    /// Number of lines dropped because they did not decode
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> EventSource for JsonLinesSource<R> {
    async fn next_event(&mut self) -> Result<Option<InboundEvent>, IngestError> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_number += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match decode_event(line.as_bytes()) {
                Ok(event) => {
                    debug!("Decoded event for sensor {} (line {})", event.sensor_id(), self.line_number);
                    return Ok(Some(event));
                }
                Err(e) => {
                    self.skipped += 1;
                    warn!("Skipping line {}: {}", self.line_number, e);
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_data_event() {
        let event = decode_event(
            br#"{"kind": "data", "sensor_id": 12, "timestamp": 1700000000, "payload": {"co2": 415.2}}"#,
        )
        .unwrap();

        match event {
            InboundEvent::Data { sensor_id, timestamp, payload } => {
                assert_eq!(sensor_id, SensorId::from("12"));
                assert_eq!(timestamp, 1_700_000_000);
                assert_eq!(payload["co2"], json!(415.2));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_decode_log_event_with_fractional_timestamp() {
        let event = decode_event(
            br#"{"kind": "log", "sensor_id": "roof", "subject": "ups - on battery", "severity": "WARNING", "timestamp": 1700000000.57}"#,
        )
        .unwrap();

        assert_eq!(
            event,
            InboundEvent::Log {
                sensor_id: "roof".into(),
                subject: "ups - on battery".into(),
                severity: Severity::Warning,
                timestamp: 1_700_000_000,
            }
        );
    }

    #[test]
    fn test_decode_data_without_payload() {
        let event = decode_event(br#"{"kind": "data", "sensor_id": "a", "timestamp": 1}"#).unwrap();
        assert_eq!(event.timestamp(), 1);
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(decode_event(br#"{"kind": "data", "sensor_id": "a", "timestamp": -3}"#).is_err());
        assert!(decode_event(br#"{"kind": "data", "sensor_id": "a", "timestamp": 1e30}"#).is_err());
        assert!(decode_event(br#"{"kind": "data", "sensor_id": "a", "timestamp": 18446744073709551616.0}"#).is_err());
        assert!(decode_event(br#"{"kind": "log", "sensor_id": "a", "subject": "x", "severity": "loud", "timestamp": 1}"#).is_err());
        assert!(decode_event(br#"{"kind": "heartbeat", "sensor_id": "a", "timestamp": 1}"#).is_err());
        assert!(decode_event(b"not json").is_err());
    }

    #[tokio::test]
    async fn test_json_lines_source_skips_bad_lines() {
        let input = concat!(
            "{\"kind\": \"data\", \"sensor_id\": 1, \"timestamp\": 10}\n",
            "\n",
            "garbage\n",
            "{\"kind\": \"log\", \"sensor_id\": 1, \"subject\": \"s\", \"severity\": \"info\", \"timestamp\": 11}\n",
        );
        let mut source = JsonLinesSource::new(input.as_bytes());

        let first = source.next_event().await.unwrap().unwrap();
        assert_eq!(first.timestamp(), 10);
        let second = source.next_event().await.unwrap().unwrap();
        assert_eq!(second.timestamp(), 11);
        assert!(source.next_event().await.unwrap().is_none());
        assert_eq!(source.skipped(), 1);
    }
}
