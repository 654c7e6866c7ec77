//! # Retry Policy
//!
//! Exponential back-off keyed on `state_count`. A failed attempt is recorded
//! as a self-transition, so `state_count` doubles as the attempt counter and
//! `state_timestamp` as the time of the last attempt.

use super::config::DispatcherConfig;
use shared_types::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub limit: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    pub fn from_config(config: &DispatcherConfig) -> Self {
        Self {
            limit: config.retry_limit,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }

    /// `min(base * 2^(state_count - 1), max)` for retries, 0 for the first
    /// attempt in a state.
    pub fn delay_for(&self, state_count: u32) -> u64 {
        if state_count <= 1 {
            return 0;
        }
        let exponent = (state_count - 1).min(63);
        self.base_delay_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_delay_ms)
    }

    /// Back-off since the last attempt has elapsed.
    pub fn is_due(&self, state_count: u32, state_timestamp: Timestamp, now: Timestamp) -> bool {
        now >= state_timestamp.saturating_add(self.delay_for(state_count))
    }

    pub fn is_exhausted(&self, state_count: u32) -> bool {
        state_count > self.limit
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&DispatcherConfig::default())
    }
}
