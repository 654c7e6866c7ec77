//! # Runtime Configuration
//!
//! One struct aggregating every subsystem's settings, loaded from the
//! environment at startup.

use connector_telemetry::{TelemetryConfig, TelemetryError};
use dc_03_lease_store::{DispatcherConfig, LeaseConfig};
use dc_04_offer_resolver::ResolverConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub telemetry: TelemetryConfig,
    pub lease: LeaseConfig,
    /// Shared by the negotiation and transfer dispatchers.
    pub dispatcher: DispatcherConfig,
    pub resolver: ResolverConfig,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self {
            telemetry: TelemetryConfig::from_env(),
            lease: LeaseConfig::from_env(),
            dispatcher: DispatcherConfig::from_env(),
            resolver: ResolverConfig::from_env(),
        }
    }

    pub fn validate(&self) -> Result<(), RuntimeConfigError> {
        self.telemetry.validate()?;
        self.lease.validate()?;
        self.dispatcher.validate()?;
        self.resolver.validate()?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum RuntimeConfigError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error(transparent)]
    Store(#[from] dc_03_lease_store::ConfigError),

    #[error(transparent)]
    Resolver(#[from] dc_04_offer_resolver::ConfigError),
}
