//! # Algorithms
//!
//! Pure paging arithmetic used by the resolver service.

pub mod window;

pub use window::{plan_slice, Slice};
