//! # Domain Module
//!
//! Assets, definitions, requests, resolved datasets, configuration and
//! errors.

pub mod asset;
pub mod config;
pub mod dataset;
pub mod definition;
pub mod errors;

pub use asset::*;
pub use config::*;
pub use dataset::*;
pub use definition::*;
pub use errors::*;
