//! # Dispatch
//!
//! Polling loop that drives leased entities through their state processors.

pub mod manager;

pub use manager::{StateMachineManager, TickReport};
