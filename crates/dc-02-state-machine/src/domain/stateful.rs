//! # Stateful Entity
//!
//! Bookkeeping shared by every long-running process. Embedded by value in
//! [`ContractNegotiation`](super::ContractNegotiation) and
//! [`TransferProcess`](super::TransferProcess).

use super::state::StateCode;
use serde::{Deserialize, Serialize};
use shared_types::Timestamp;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatefulEntity<S> {
    pub id: String,
    pub state: S,
    /// Transitions into the current state; 0 for a fresh entity.
    pub state_count: u32,
    /// Last state mutation. Never moves backwards.
    pub state_timestamp: Timestamp,
    pub created_at: Timestamp,
    /// Written by the store on every save.
    pub updated_at: Timestamp,
    pub error_detail: Option<String>,
    pub trace_context: BTreeMap<String, String>,
}

impl<S: StateCode> StatefulEntity<S> {
    pub fn new(id: impl Into<String>, initial: S, now: Timestamp) -> Self {
        Self {
            id: id.into(),
            state: initial,
            state_count: 0,
            state_timestamp: now,
            created_at: now,
            updated_at: now,
            error_detail: None,
            trace_context: BTreeMap::new(),
        }
    }

    /// Moves to `target` without any legality check. Callers go through a
    /// [`TransitionTable`](super::TransitionTable).
    pub(crate) fn enter(&mut self, target: S, now: Timestamp) {
        if self.state == target {
            self.state_count = self.state_count.saturating_add(1);
        } else {
            self.state = target;
            self.state_count = 1;
        }
        self.update_state_timestamp(now);
    }

    /// Refreshes `state_timestamp`, e.g. after a successful retry of a side
    /// effect that did not change the state.
    pub fn update_state_timestamp(&mut self, now: Timestamp) {
        self.state_timestamp = self.state_timestamp.max(now);
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}
