//! # DC-01 Query Engine
//!
//! Predicate and sort evaluation over entity field paths.
//!
//! **Subsystem ID:** 1
//! **Architecture:** Hexagonal (domain + pure algorithms, no I/O)
//!
//! ## Purpose
//!
//! Stores and the offer resolver filter entities by `(path, operator, value)`
//! criteria and page them with a single-field sort. Instead of reflecting
//! over structs, every queryable type publishes a [`FieldRegistry`] that maps
//! dotted paths to accessor functions.
//!
//! ## Query Semantics
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | Unknown filter path | Criterion matches nothing (empty result) |
//! | Unknown sort field | `QueryError::UnsupportedSortField` at compile time |
//! | Unknown operator | `QueryError::UnsupportedOperator` when the criterion is built |
//! | Path into a collection | Matches if any element matches |
//! | Equal sort keys | Original order kept (stable sort) |
//!
//! ## Module Structure
//!
//! ```text
//! dc-01-query-engine/
//! ├── domain/          # Criterion, Operator, FieldValue, QuerySpec, FieldRegistry, errors
//! └── algorithms/      # like-pattern compilation, compiled queries
//! ```

#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;

pub use algorithms::{compile_like, count, execute, CompiledQuery};
pub use domain::{
    Criterion, FieldRef, FieldRegistry, FieldValue, Operand, Operator, QueryError, QuerySpec,
    QuerySpecBuilder, Queryable, SortOrder, DEFAULT_LIMIT,
};
