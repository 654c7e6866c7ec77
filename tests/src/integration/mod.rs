//! # Integration Flows
//!
//! Each module drives real subsystems through the runtime container. Only
//! the clock and the remote dispatcher are replaced.

pub mod catalog;
pub mod flows;
pub mod leasing;
