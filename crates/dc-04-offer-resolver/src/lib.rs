//! # DC-04 Offer Resolver
//!
//! Catalog resolution: turns a requester and a global page window into
//! policy-attached datasets drawn from every contract definition the
//! requester may see.
//!
//! **Subsystem ID:** 4
//! **Architecture:** Hexagonal (domain, ports, service, in-memory adapters)
//!
//! ## Algorithm
//!
//! Definitions are laid end to end in the order the definition source
//! returns them. For each one the resolver counts matching assets; a
//! definition that ends before the window costs nothing more. Overlapping
//! definitions get one asset query for their slice and one policy lookup.
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Result length is `min(to - from, total - from)` | `plan_slice` bookkeeping |
//! | No asset or policy query before the window | `plan_slice` returns `None` |
//! | Missing policy never fails the request | `MissingPolicyMode` |
//! | One clock read per request | `ContractOfferResolver::query_datasets` |
//!
//! ## Module Structure
//!
//! ```text
//! dc-04-offer-resolver/
//! ├── domain/       # Asset, definitions, OfferRequest, Dataset, config, errors
//! ├── ports/        # OfferResolverApi (inbound), collaborators (outbound)
//! ├── algorithms/   # window arithmetic
//! ├── service/      # ContractOfferResolver
//! └── adapters/     # in-memory asset index, policy store, definition source
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{
    AccessPredicate, InMemoryAssetIndex, InMemoryContractDefinitionResolver,
    InMemoryPolicyDefinitionStore,
};
pub use domain::{
    Asset, ConfigError, ContractDefinition, Dataset, MissingPolicyMode, OfferRange, OfferRequest,
    ParticipantAgent, PolicyDefinition, ResolveError, ResolverConfig, ASSET_ID_PROPERTY,
};
pub use ports::{AssetIndex, ContractDefinitionResolver, OfferResolverApi, PolicyDefinitionStore};
pub use service::ContractOfferResolver;
