//! Telemetry configuration from environment variables.

use crate::TelemetryError;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name attached to every log line.
    pub service_name: String,

    /// `EnvFilter` directives, e.g. `info` or `dc_03_lease_store=debug,info`.
    pub log_level: String,

    /// JSON lines instead of human-readable output.
    pub json_logs: bool,

    /// Include source file and line in JSON output.
    pub with_location: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "dataspace-connector".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_location: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OTEL_SERVICE_NAME`: Service name (default: dataspace-connector)
    /// - `DC_LOG_LEVEL` or `RUST_LOG`: Filter directives (default: info)
    /// - `DC_JSON_LOGS`: JSON output (default: false, true in containers)
    /// - `DC_LOG_LOCATION`: Source locations in JSON output (default: false)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "dataspace-connector".to_string()),

            log_level: env::var("DC_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("DC_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),

            with_location: env::var("DC_LOG_LOCATION")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    pub fn validate(&self) -> Result<(), TelemetryError> {
        if self.service_name.trim().is_empty() {
            return Err(TelemetryError::Config("service_name cannot be empty".into()));
        }
        if self.log_level.trim().is_empty() {
            return Err(TelemetryError::Config("log_level cannot be empty".into()));
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    value == "true" || value == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "dataspace-connector");
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("no"));
    }

    #[test]
    fn test_empty_level_rejected() {
        let config = TelemetryConfig {
            log_level: " ".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TelemetryError::Config(_))));
    }

    #[test]
    fn test_partial_config_deserializes() {
        let config: TelemetryConfig = serde_json::from_str(r#"{"json_logs": true}"#).unwrap();
        assert!(config.json_logs);
        assert_eq!(config.log_level, "info");
    }
}
