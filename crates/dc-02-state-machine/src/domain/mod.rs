//! # Domain Module
//!
//! Lifecycle entities, their states and transition tables.

pub mod agreement;
pub mod entity;
pub mod errors;
pub mod negotiation;
pub mod state;
pub mod stateful;
pub mod table;
pub mod transfer;

pub use agreement::*;
pub use entity::*;
pub use errors::*;
pub use negotiation::*;
pub use state::{ProcessType, StateCode};
pub use stateful::*;
pub use table::*;
pub use transfer::*;
