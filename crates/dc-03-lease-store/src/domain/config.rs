//! # Configuration
//!
//! Lease and dispatcher settings. Defaults suit a single local worker;
//! `from_env` overrides individual values.

use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Lease settings of one store handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaseConfig {
    /// Worker identity written into leases.
    pub lease_holder: String,
    /// Lease length in milliseconds.
    pub lease_duration_ms: u64,
}

impl Default for LeaseConfig {
    fn default() -> Self {
        Self {
            lease_holder: format!("connector-{}", uuid::Uuid::new_v4()),
            lease_duration_ms: 60_000,
        }
    }
}

impl LeaseConfig {
    /// # Environment Variables
    ///
    /// - `DC_LEASE_HOLDER`: worker identity (default: `connector-<uuid>`)
    /// - `DC_LEASE_DURATION_MS`: lease length (default: 60000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            lease_holder: env::var("DC_LEASE_HOLDER").unwrap_or(defaults.lease_holder),
            lease_duration_ms: env_parse("DC_LEASE_DURATION_MS")
                .unwrap_or(defaults.lease_duration_ms),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lease_holder.trim().is_empty() {
            return Err(ConfigError::InvalidLease(
                "lease_holder cannot be empty".into(),
            ));
        }
        if self.lease_duration_ms == 0 {
            return Err(ConfigError::InvalidLease(
                "lease_duration_ms cannot be 0".into(),
            ));
        }
        Ok(())
    }
}

/// Polling and retry settings of a state machine dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Delay between polling rounds.
    pub interval_ms: u64,
    /// Entities claimed per processor and round.
    pub batch_size: usize,
    /// Attempts in the same state before the processor is told to give up.
    pub retry_limit: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1_000,
            batch_size: 5,
            retry_limit: 7,
            retry_base_delay_ms: 1_000,
            retry_max_delay_ms: 60_000,
        }
    }
}

impl DispatcherConfig {
    /// # Environment Variables
    ///
    /// - `DC_DISPATCH_INTERVAL_MS` (default: 1000)
    /// - `DC_DISPATCH_BATCH_SIZE` (default: 5)
    /// - `DC_RETRY_LIMIT` (default: 7)
    /// - `DC_RETRY_BASE_DELAY_MS` (default: 1000)
    /// - `DC_RETRY_MAX_DELAY_MS` (default: 60000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            interval_ms: env_parse("DC_DISPATCH_INTERVAL_MS").unwrap_or(defaults.interval_ms),
            batch_size: env_parse("DC_DISPATCH_BATCH_SIZE").unwrap_or(defaults.batch_size),
            retry_limit: env_parse("DC_RETRY_LIMIT").unwrap_or(defaults.retry_limit),
            retry_base_delay_ms: env_parse("DC_RETRY_BASE_DELAY_MS")
                .unwrap_or(defaults.retry_base_delay_ms),
            retry_max_delay_ms: env_parse("DC_RETRY_MAX_DELAY_MS")
                .unwrap_or(defaults.retry_max_delay_ms),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::InvalidDispatcher(
                "interval_ms cannot be 0".into(),
            ));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidDispatcher(
                "batch_size cannot be 0".into(),
            ));
        }
        if self.retry_base_delay_ms > self.retry_max_delay_ms {
            return Err(ConfigError::InvalidDispatcher(format!(
                "retry_base_delay_ms ({}) exceeds retry_max_delay_ms ({})",
                self.retry_base_delay_ms, self.retry_max_delay_ms
            )));
        }
        Ok(())
    }
}
