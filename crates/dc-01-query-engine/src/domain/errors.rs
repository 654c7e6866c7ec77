//! # Domain Errors
//!
//! Every variant is a caller or configuration error: fatal, never retried.

use super::criterion::Operator;
use thiserror::Error;

/// Query construction and compilation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Operator string is not one of `=`, `like`, `in`.
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Sort field is not registered for the queried type.
    #[error("Unsupported sort field: {field}")]
    UnsupportedSortField { field: String },

    /// Right operand has the wrong shape for the operator.
    #[error("Invalid operand for '{operator}': {reason}")]
    InvalidOperand {
        operator: Operator,
        reason: &'static str,
    },

    /// `like` pattern could not be compiled.
    #[error("Invalid like pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}
