//! # Domain Module
//!
//! Core types of the query engine.

pub mod criterion;
pub mod errors;
pub mod query_spec;
pub mod registry;
pub mod value;

pub use criterion::*;
pub use errors::*;
pub use query_spec::*;
pub use registry::*;
pub use value::*;
