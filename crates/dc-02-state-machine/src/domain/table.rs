//! # Transition Tables
//!
//! A table maps each target state to the rules that allow entering it. A
//! rule lists its legal source states and may be restricted to one
//! [`ProcessType`]. Tables are plain data, built once per entity kind.

use super::errors::TransitionError;
use super::state::{ProcessType, StateCode};
use super::stateful::StatefulEntity;
use shared_types::Timestamp;
use std::collections::HashMap;

/// Legal source states of a rule.
pub enum Sources<S: 'static> {
    /// An explicit list.
    Set(&'static [S]),
    /// Any state that is not terminal.
    NonTerminal,
    /// Non-linear cases (e.g. "any state before COMPLETED").
    Predicate(fn(S) -> bool),
}

impl<S: StateCode> Sources<S> {
    pub fn admits(&self, from: S) -> bool {
        match self {
            Self::Set(states) => states.contains(&from),
            Self::NonTerminal => !from.is_terminal(),
            Self::Predicate(predicate) => predicate(from),
        }
    }
}

pub struct Rule<S: 'static> {
    pub sources: Sources<S>,
    /// `None` applies to both roles.
    pub role: Option<ProcessType>,
}

pub struct TransitionTable<S: 'static> {
    rules: HashMap<S, Vec<Rule<S>>>,
}

impl<S: StateCode> TransitionTable<S> {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Rule for either role.
    pub fn allow(self, target: S, sources: &'static [S]) -> Self {
        self.rule(target, None, Sources::Set(sources))
    }

    /// Rule restricted to `role`.
    pub fn allow_for(self, target: S, role: ProcessType, sources: &'static [S]) -> Self {
        self.rule(target, Some(role), Sources::Set(sources))
    }

    pub fn rule(mut self, target: S, role: Option<ProcessType>, sources: Sources<S>) -> Self {
        self.rules
            .entry(target)
            .or_default()
            .push(Rule { sources, role });
        self
    }

    /// Checks `from -> to` for an entity playing `role`. Returns the reason
    /// on failure.
    pub fn check(&self, from: S, to: S, role: ProcessType) -> Result<(), String> {
        if from.is_terminal() {
            return Err(format!("{from} is terminal"));
        }
        let rules = self
            .rules
            .get(&to)
            .ok_or_else(|| format!("{to} is not a transition target"))?;

        let mut applicable = rules
            .iter()
            .filter(|rule| rule.role.map_or(true, |r| r == role))
            .peekable();
        if applicable.peek().is_none() {
            return Err(format!("only {} entities may enter {to}", role.other()));
        }
        if applicable.any(|rule| rule.sources.admits(from)) {
            Ok(())
        } else {
            Err(format!("{from} is not a legal source for {role} entities"))
        }
    }

    pub fn can_transition(&self, from: S, to: S, role: ProcessType) -> bool {
        self.check(from, to, role).is_ok()
    }

    /// Checks and applies `target`. On failure the entity is untouched.
    pub fn apply(
        &self,
        entity: &mut StatefulEntity<S>,
        role: ProcessType,
        target: S,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        self.check(entity.state, target, role)
            .map_err(|reason| TransitionError::IllegalTransition {
                entity_id: entity.id.clone(),
                from: entity.state.to_string(),
                to: target.to_string(),
                reason,
            })?;
        entity.enter(target, now);
        Ok(())
    }
}

impl<S: StateCode> Default for TransitionTable<S> {
    fn default() -> Self {
        Self::new()
    }
}
