//! # Ports
//!
//! - **Outbound**: the store contract backends implement
//! - **Inbound**: state processors driven by the dispatcher

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
