//! # Shared Types Crate
//!
//! Value types used across the contract lifecycle subsystems.
//!
//! ## Design Principles
//!
//! - **Injected Time**: Nothing reads the wall clock directly. Every timestamp
//!   and every lease expiry check goes through a [`TimeSource`].
//! - **Plain Data**: Types here carry no behaviour beyond small helpers, so
//!   each subsystem can own the rules that apply to them.

pub mod entities;
pub mod lease;
pub mod time;

pub use entities::*;
pub use lease::Lease;
pub use time::{MockTimeSource, SystemTimeSource, TimeSource, Timestamp};
