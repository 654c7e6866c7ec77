//! # State Entity Trait
//!
//! What stores and dispatchers need to know about a lifecycle entity,
//! independent of its kind.

use super::errors::TransitionError;
use super::state::{ProcessType, StateCode};
use super::stateful::StatefulEntity;
use super::table::TransitionTable;
use dc_01_query_engine::Queryable;
use serde::{de::DeserializeOwned, Serialize};
use shared_types::Timestamp;

pub trait StateEntity: Queryable + Clone + Send + Sync + Serialize + DeserializeOwned {
    type State: StateCode;

    /// Kind name used in logs and errors.
    const KIND: &'static str;

    fn transition_table() -> &'static TransitionTable<Self::State>;

    fn stateful(&self) -> &StatefulEntity<Self::State>;

    fn stateful_mut(&mut self) -> &mut StatefulEntity<Self::State>;

    fn process_type(&self) -> ProcessType;

    fn correlation_id(&self) -> Option<&str>;

    fn id(&self) -> &str {
        &self.stateful().id
    }

    fn state(&self) -> Self::State {
        self.stateful().state
    }

    fn state_count(&self) -> u32 {
        self.stateful().state_count
    }

    fn state_timestamp(&self) -> Timestamp {
        self.stateful().state_timestamp
    }

    /// Self-transition used to record a failed attempt: bumps `state_count`
    /// and refreshes `state_timestamp`. Fails where the table has no
    /// self-loop.
    fn retry_current_state(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        let role = self.process_type();
        let state = self.state();
        Self::transition_table().apply(self.stateful_mut(), role, state, now)
    }

    /// Structural reason this entity must never be deleted, if any.
    fn deletion_blocker(&self) -> Option<String> {
        None
    }
}
