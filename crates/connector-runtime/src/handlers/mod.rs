//! # State Processors
//!
//! Processors the runtime registers with its dispatchers. Each claims one
//! outbound state, sends the protocol message it calls for through the
//! [`RemoteMessageDispatcher`](crate::adapters::RemoteMessageDispatcher)
//! port and advances the entity.

pub mod forward;
pub mod negotiation;
pub mod transfer;

pub use forward::{ForwardProcessor, RemoteParty};
pub use negotiation::negotiation_processors;
pub use transfer::transfer_processors;
