// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Staleness policy - maps a timestamp age to fresh/stale

use serde::{Deserialize, Serialize};

/// Default staleness threshold (ten minutes)
pub const DEFAULT_STALE_AFTER_SECS: u64 = 600;

/// Age classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    Fresh,
    Stale,
}

/// Thresholds used to classify ages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StalenessPolicy {
    /// Ages strictly above this are stale
    pub stale_after_secs: u64,
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self {
            stale_after_secs: DEFAULT_STALE_AFTER_SECS,
        }
    }
}

impl StalenessPolicy {
    pub fn new(stale_after_secs: u64) -> Self {
        Self { stale_after_secs }
    }

    pub fn classify(&self, age_seconds: i64) -> Freshness {
        classify_age(age_seconds, self)
    }

    /// Classify the age of `timestamp` as seen at `now`.
    pub fn classify_timestamp(&self, timestamp: u64, now: u64) -> Freshness {
        classify_age(age_between(timestamp, now), self)
    }
}

/// Negative ages come from clock skew and count as fresh.
pub fn classify_age(age_seconds: i64, thresholds: &StalenessPolicy) -> Freshness {
    if age_seconds > 0 && age_seconds as u64 > thresholds.stale_after_secs {
        Freshness::Stale
    } else {
        Freshness::Fresh
    }
}

/// Signed `now - timestamp`, saturating at the `i64` range.
pub fn age_between(timestamp: u64, now: u64) -> i64 {
    let age = now as i128 - timestamp as i128;
    age.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundary() {
        let policy = StalenessPolicy::new(300);
        assert_eq!(classify_age(0, &policy), Freshness::Fresh);
        assert_eq!(classify_age(300, &policy), Freshness::Fresh);
        assert_eq!(classify_age(301, &policy), Freshness::Stale);
    }

    #[test]
    fn test_negative_age_is_fresh() {
        let policy = StalenessPolicy::new(0);
        assert_eq!(classify_age(-5, &policy), Freshness::Fresh);
        assert_eq!(classify_age(i64::MIN, &policy), Freshness::Fresh);
    }

    #[test]
    fn test_classify_timestamp() {
        let policy = StalenessPolicy::default();
        assert_eq!(policy.classify_timestamp(1_000, 1_000 + 600), Freshness::Fresh);
        assert_eq!(policy.classify_timestamp(1_000, 1_000 + 601), Freshness::Stale);
        assert_eq!(policy.classify_timestamp(2_000, 1_000), Freshness::Fresh);
    }

    #[test]
    fn test_age_between_saturates() {
        assert_eq!(age_between(0, u64::MAX), i64::MAX);
        assert_eq!(age_between(u64::MAX, 0), i64::MIN);
        assert_eq!(age_between(10, 4), -6);
    }
}
