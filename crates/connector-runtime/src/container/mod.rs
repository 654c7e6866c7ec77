//! # Container
//!
//! Configuration and the subsystem container built from it.

pub mod config;
pub mod subsystems;

pub use config::{RuntimeConfig, RuntimeConfigError};
pub use subsystems::ConnectorContainer;
