//! # Runtime Ports
//!
//! Outbound seam to the protocol layer. Processors describe the message a
//! state calls for; the wire encoding and transport live behind this port.

use async_trait::async_trait;
use thiserror::Error;

/// A protocol message owed to the counter-party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMessage {
    /// Protocol message name, e.g. `ContractRequestMessage`.
    pub message_type: &'static str,
    /// Entity kind the message is about.
    pub process_kind: &'static str,
    pub process_id: String,
    /// Counter-party's id for the same process, if known.
    pub correlation_id: Option<String>,
    pub counter_party_address: String,
    pub protocol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("Counter-party unreachable at {address}: {reason}")]
    Unreachable { address: String, reason: String },

    #[error("Message rejected by counter-party: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait RemoteMessageDispatcher: Send + Sync {
    async fn dispatch(&self, message: RemoteMessage) -> Result<(), RemoteError>;
}
