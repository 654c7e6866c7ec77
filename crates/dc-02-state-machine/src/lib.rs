//! # DC-02 State Machine Model
//!
//! Role-aware finite state machines for contract negotiations and transfer
//! processes.
//!
//! **Subsystem ID:** 2
//! **Architecture:** Hexagonal (pure domain, no I/O)
//!
//! ## Purpose
//!
//! Protocol drivers and dispatchers never assign states directly. They call
//! a `transition_*` method, which consults the entity kind's
//! [`TransitionTable`] and either applies the move or returns
//! [`TransitionError::IllegalTransition`] with the entity untouched.
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | State moves only along table edges | `TransitionTable::apply` |
//! | Role-restricted targets | `Rule::role`, checked against the entity type |
//! | Terminal states have no outgoing edges | `TransitionTable::check` |
//! | `state_count` resets to 1 on change, increments on repeat | `StatefulEntity::enter` |
//! | `state_timestamp` never decreases | `StatefulEntity::update_state_timestamp` |
//! | Provider entities carry a correlation id | builders |
//! | Contract agreement is write-once | `ContractNegotiation::set_contract_agreement` |
//! | Negotiations with an agreement are never deleted | `StateEntity::deletion_blocker` |
//!
//! ## Module Structure
//!
//! ```text
//! dc-02-state-machine/
//! └── domain/
//!     ├── state.rs        # StateCode, ProcessType
//!     ├── stateful.rs     # StatefulEntity bookkeeping
//!     ├── table.rs        # TransitionTable, Rule, Sources
//!     ├── entity.rs       # StateEntity trait used by stores
//!     ├── negotiation.rs  # ContractNegotiation
//!     ├── transfer.rs     # TransferProcess
//!     ├── agreement.rs    # ContractAgreement
//!     └── errors.rs       # TransitionError
//! ```

#![warn(clippy::all)]

pub mod domain;

pub use domain::{
    ContractAgreement, ContractNegotiation, ContractNegotiationBuilder, ContractNegotiationState,
    DeprovisionedResource, ProcessType, ProvisionedResource, ResourceDefinition,
    ResourceManifest, Rule, Sources, StateCode, StateEntity, StatefulEntity, TransferProcess,
    TransferProcessBuilder, TransferProcessState, TransitionError, TransitionTable,
};
