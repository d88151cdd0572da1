//! # Freshness Window
//!
//! A signed timestamp is accepted iff
//! `now - max_age_secs <= timestamp <= now + max_future_skew_secs`.
//! Both bounds are inclusive.

use crate::errors::ProcessFault;
use registry_types::Timestamp;
use serde::{Deserialize, Serialize};

/// Accepted age and future skew of signed timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessWindow {
    /// How far in the past a timestamp may lie.
    pub max_age_secs: u64,
    /// How far in the future a timestamp may lie.
    pub max_future_skew_secs: u64,
}

impl Default for FreshnessWindow {
    fn default() -> Self {
        Self {
            max_age_secs: 60,
            max_future_skew_secs: 60,
        }
    }
}

impl FreshnessWindow {
    /// Check `timestamp` against ledger time `now`.
    pub fn check(&self, timestamp: Timestamp, now: Timestamp) -> Result<(), ProcessFault> {
        if timestamp < now.saturating_sub(self.max_age_secs) {
            return Err(ProcessFault::StaleTimestamp { timestamp, now });
        }
        if timestamp > now.saturating_add(self.max_future_skew_secs) {
            return Err(ProcessFault::FutureTimestamp { timestamp, now });
        }
        Ok(())
    }
}
