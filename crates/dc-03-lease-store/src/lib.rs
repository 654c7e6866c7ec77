//! # DC-03 Lease-Based Store
//!
//! Leased persistence for state entities, plus the dispatcher that drives
//! them.
//!
//! **Subsystem ID:** 3
//! **Architecture:** Hexagonal (ports + in-memory adapter + dispatch loop)
//!
//! ## Purpose
//!
//! Several connector workers share one store. A worker claims an entity by
//! leasing it, acts on it, and releases the lease by saving. A live lease
//! held by someone else blocks saves, deletes and further claims until it
//! expires.
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | At most one live lease per entity | `InMemoryEntityStore` critical section |
//! | Expired leases count as absent | `Lease::blocks` |
//! | Save by the holder releases the lease | `StateEntityStore::save` |
//! | Claims return oldest `state_timestamp` first | `next_not_leased` |
//! | No entity claimed twice concurrently | claim and lease in one lock scope |
//! | Negotiations holding an agreement are never deleted | `StateEntity::deletion_blocker` |
//! | Failed attempts back off exponentially | `RetryPolicy` |
//!
//! ## Module Structure
//!
//! ```text
//! dc-03-lease-store/
//! ├── domain/      # StoreFailure, ProcessingError, configs, RetryPolicy
//! ├── ports/       # StateEntityStore (outbound), StateProcessor (inbound)
//! ├── adapters/    # InMemoryEntityStore
//! └── dispatch/    # StateMachineManager
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod dispatch;
pub mod domain;
pub mod ports;

pub use adapters::{
    InMemoryEntityStore, InMemoryNegotiationStore, InMemoryTable, InMemoryTransferProcessStore,
};
pub use dispatch::{StateMachineManager, TickReport};
pub use domain::{
    ConfigError, DispatcherConfig, LeaseConfig, ProcessingError, RetryPolicy, StoreFailure,
};
pub use ports::{
    ContractNegotiationStore, RetryContext, StateEntityStore, StateProcessor, TransferProcessStore,
};
