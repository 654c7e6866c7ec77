//! # Resolver Configuration

use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// What a definition without a resolvable contract policy does to the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicyMode {
    /// Emit nothing and let later definitions fill the page.
    #[default]
    SkipSlice,
    /// The slice keeps its window positions; the page comes back short.
    ReserveSlice,
}

impl FromStr for MissingPolicyMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" | "skip_slice" => Ok(Self::SkipSlice),
            "reserve" | "reserve_slice" => Ok(Self::ReserveSlice),
            other => Err(ConfigError::InvalidResolver(format!(
                "unknown missing policy mode: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Window size for requests without a range.
    pub default_page_size: u64,
    pub missing_policy: MissingPolicyMode,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            missing_policy: MissingPolicyMode::SkipSlice,
        }
    }
}

impl ResolverConfig {
    /// # Environment Variables
    ///
    /// - `DC_DEFAULT_PAGE_SIZE` (default: 50)
    /// - `DC_MISSING_POLICY`: `skip` or `reserve` (default: `skip`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_page_size: env::var("DC_DEFAULT_PAGE_SIZE")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.default_page_size),
            missing_policy: env::var("DC_MISSING_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.missing_policy),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 {
            return Err(ConfigError::InvalidResolver(
                "default_page_size cannot be 0".into(),
            ));
        }
        Ok(())
    }
}
