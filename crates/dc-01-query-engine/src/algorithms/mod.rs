//! # Algorithms
//!
//! Pure query evaluation. No I/O.

pub mod compiled;
pub mod like;

pub use compiled::{count, execute, CompiledQuery};
pub use like::compile_like;
