// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Typed errors for the inbound boundary
//!
//! The aggregation core itself never fails. These errors only describe
//! input that could not be turned into an event in the first place.

use thiserror::Error;

/// Failure to parse one of the closed enumerations from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown severity: {0:?}")]
    Severity(String),
}

/// Failure to decode an inbound event
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed event: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("event source failed: {0}")]
    Io(#[from] std::io::Error),
}
