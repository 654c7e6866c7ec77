//! # Inbound Ports
//!
//! Handlers plugged into a
//! [`StateMachineManager`](crate::dispatch::StateMachineManager). Protocol
//! drivers implement [`StateProcessor`] once per state they act on.

use crate::domain::ProcessingError;
use async_trait::async_trait;
use dc_02_state_machine::StateEntity;

/// Attempt bookkeeping handed to a processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryContext {
    /// Attempts made in the current state (`state_count`).
    pub attempt: u32,
    /// The retry limit is used up; the processor should terminate the entity.
    pub exhausted: bool,
}

#[async_trait]
pub trait StateProcessor<E: StateEntity>: Send + Sync {
    /// State whose entities this processor claims.
    fn state(&self) -> E::State;

    /// Overrides the dispatcher's batch size.
    fn batch_size(&self) -> Option<usize> {
        None
    }

    /// Performs the state's side effect and returns the entity to save,
    /// normally after a transition. The entity arrives leased to the
    /// dispatcher's store handle.
    async fn process(&self, entity: E, retry: RetryContext) -> Result<E, ProcessingError>;
}
