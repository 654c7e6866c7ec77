//! Remote dispatch adapter that only logs.
//!
//! Stands in for a protocol client until one is wired in. Every message is
//! accepted.

use super::ports::{RemoteError, RemoteMessage, RemoteMessageDispatcher};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

#[derive(Debug, Default)]
pub struct LoggingRemoteDispatcher {
    dispatched: AtomicU64,
}

impl LoggingRemoteDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages accepted so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RemoteMessageDispatcher for LoggingRemoteDispatcher {
    async fn dispatch(&self, message: RemoteMessage) -> Result<(), RemoteError> {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        info!(
            message_type = message.message_type,
            kind = message.process_kind,
            entity_id = %message.process_id,
            correlation_id = ?message.correlation_id,
            counter_party = %message.counter_party_address,
            protocol = %message.protocol,
            "[runtime] Dispatching remote message"
        );
        Ok(())
    }
}
