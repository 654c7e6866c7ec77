//! # Adapters
//!
//! Store backends. Only the in-memory reference backend ships here; SQL or
//! document-store backends implement the same port elsewhere.

pub mod memory;

pub use memory::{
    InMemoryEntityStore, InMemoryNegotiationStore, InMemoryTable, InMemoryTransferProcessStore,
};
