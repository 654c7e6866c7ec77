//! # Domain Module
//!
//! Store failures, configuration and retry policy.

pub mod config;
pub mod errors;
pub mod retry;

pub use config::*;
pub use errors::*;
pub use retry::*;
