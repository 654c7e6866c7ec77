//! # Domain Errors
//!
//! Store failures carry a glossary reason code so protocol layers can map
//! them without matching on variants.

use dc_01_query_engine::QueryError;
use dc_02_state_machine::TransitionError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreFailure {
    #[error("Entity {id} not found")]
    NotFound { id: String },

    /// Another worker holds a live lease. Retry later.
    #[error("Entity {id} is leased by {owner}")]
    AlreadyLeased { id: String, owner: String },

    /// Structural conflict, e.g. a negotiation that carries an agreement.
    #[error("Entity {id} cannot be deleted: {reason}")]
    NotDeletable { id: String, reason: String },

    #[error("Illegal argument: {0}")]
    IllegalArgument(#[from] QueryError),
}

impl StoreFailure {
    /// Glossary reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AlreadyLeased { .. } => "ALREADY_LEASED",
            Self::NotDeletable { .. } => "CONFLICT",
            Self::IllegalArgument(_) => "ILLEGAL_ARGUMENT",
        }
    }

    /// Contention only; everything else is fatal for the request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AlreadyLeased { .. })
    }
}

/// Failure reported by a state processor.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Store(#[from] StoreFailure),

    /// Remote side unreachable or rejected the message.
    #[error("Remote dispatch failed: {0}")]
    Remote(String),
}

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid lease configuration: {0}")]
    InvalidLease(String),

    #[error("invalid dispatcher configuration: {0}")]
    InvalidDispatcher(String),
}
