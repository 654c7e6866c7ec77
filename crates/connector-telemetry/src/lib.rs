//! # Connector Telemetry
//!
//! Structured logging for the dataspace connector.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use connector_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `dataspace-connector` | Service name in logs |
//! | `DC_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directives |
//! | `DC_JSON_LOGS` | `false` (`true` in containers) | JSON lines output |
//! | `DC_LOG_LOCATION` | `false` | Source locations in JSON output |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("Invalid filter directives: {0}")]
    Filter(String),

    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
