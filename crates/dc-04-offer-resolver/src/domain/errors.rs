//! # Domain Errors

use dc_01_query_engine::QueryError;
use thiserror::Error;

/// Offer resolution failures.
///
/// A contract definition whose policy cannot be found is not an error; the
/// resolver logs it and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Window with `from > to`.
    #[error("Invalid range: from {from} is greater than to {to}")]
    InvalidRange { from: u64, to: u64 },

    /// Asset selector or caller criteria rejected by the query engine.
    #[error("Invalid asset query: {0}")]
    Query(#[from] QueryError),

    /// A collaborator (asset index, policy store, definition source) failed.
    #[error("Collaborator failure: {0}")]
    Collaborator(String),
}

/// Resolver configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid resolver config: {0}")]
    InvalidResolver(String),
}
