//! Generic "send, then advance" state processor.
//!
//! Most `*ING` states mean "tell the counter-party, then move to the
//! matching `*ED` state". A [`ForwardProcessor`] captures that as data: the
//! state it claims, the message it owes, and the transition to apply once the
//! message went out.

use crate::adapters::ports::{RemoteMessage, RemoteMessageDispatcher};
use async_trait::async_trait;
use connector_telemetry::log_entity_event;
use dc_02_state_machine::{ContractNegotiation, StateEntity, TransferProcess, TransitionError};
use dc_03_lease_store::{ProcessingError, RetryContext, StateProcessor};
use shared_types::{TimeSource, Timestamp};
use std::sync::Arc;

/// Transition applied after a successful dispatch.
pub type Advance<E> = fn(&mut E, Timestamp) -> Result<(), TransitionError>;

/// Transition applied once retries are exhausted.
pub type Terminate<E> = fn(&mut E, Option<String>, Timestamp) -> Result<(), TransitionError>;

/// Where protocol messages for an entity go.
pub trait RemoteParty {
    fn counter_party_address(&self) -> &str;
    fn protocol(&self) -> &str;
}

impl RemoteParty for ContractNegotiation {
    fn counter_party_address(&self) -> &str {
        &self.counter_party_address
    }

    fn protocol(&self) -> &str {
        &self.protocol
    }
}

impl RemoteParty for TransferProcess {
    fn counter_party_address(&self) -> &str {
        &self.counter_party_address
    }

    fn protocol(&self) -> &str {
        &self.protocol
    }
}

pub struct ForwardProcessor<E: StateEntity> {
    state: E::State,
    /// `None` for purely local steps such as provisioning.
    message_type: Option<&'static str>,
    advance: Advance<E>,
    terminate: Terminate<E>,
    remote: Arc<dyn RemoteMessageDispatcher>,
    clock: Arc<dyn TimeSource>,
}

impl<E: StateEntity + RemoteParty> ForwardProcessor<E> {
    pub fn new(
        state: E::State,
        message_type: Option<&'static str>,
        advance: Advance<E>,
        terminate: Terminate<E>,
        remote: Arc<dyn RemoteMessageDispatcher>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            state,
            message_type,
            advance,
            terminate,
            remote,
            clock,
        }
    }

    fn message_for(&self, entity: &E, message_type: &'static str) -> RemoteMessage {
        RemoteMessage {
            message_type,
            process_kind: E::KIND,
            process_id: entity.id().to_string(),
            correlation_id: entity.correlation_id().map(str::to_string),
            counter_party_address: entity.counter_party_address().to_string(),
            protocol: entity.protocol().to_string(),
        }
    }
}

#[async_trait]
impl<E: StateEntity + RemoteParty> StateProcessor<E> for ForwardProcessor<E> {
    fn state(&self) -> E::State {
        self.state
    }

    async fn process(&self, mut entity: E, retry: RetryContext) -> Result<E, ProcessingError> {
        if retry.exhausted {
            let detail = format!("{} not delivered after {} attempts", self.state, retry.attempt);
            (self.terminate)(&mut entity, Some(detail), self.clock.now())?;
            log_entity_event!(warn, E::KIND, entity.id(), entity.state(), "Terminated after retries");
            return Ok(entity);
        }

        if let Some(message_type) = self.message_type {
            let message = self.message_for(&entity, message_type);
            self.remote
                .dispatch(message)
                .await
                .map_err(|e| ProcessingError::Remote(e.to_string()))?;
        }

        (self.advance)(&mut entity, self.clock.now())?;
        log_entity_event!(debug, E::KIND, entity.id(), entity.state(), "State advanced");
        Ok(entity)
    }
}
