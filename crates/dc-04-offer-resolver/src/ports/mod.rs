//! # Ports
//!
//! - **Inbound**: `OfferResolverApi`
//! - **Outbound**: asset index, policy store, definition source

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
