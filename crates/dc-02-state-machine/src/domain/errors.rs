//! # Domain Errors
//!
//! Failures raised by lifecycle entities. All of them leave the entity
//! untouched.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// Current state is not a legal source for the target, or the only rules
    /// for the target belong to the other role.
    #[error("Illegal transition of {entity_id}: {from} -> {to} ({reason})")]
    IllegalTransition {
        entity_id: String,
        from: String,
        to: String,
        reason: String,
    },

    /// Provider-side processes are keyed by the consumer's id.
    #[error("Provider {kind} {entity_id} requires a correlation id")]
    MissingCorrelationId {
        kind: &'static str,
        entity_id: String,
    },

    /// The agreement of a negotiation is write-once.
    #[error("Contract agreement already set on negotiation {entity_id}")]
    AgreementAlreadySet { entity_id: String },
}
