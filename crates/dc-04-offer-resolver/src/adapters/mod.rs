//! # Adapters

pub mod memory;

pub use memory::{
    AccessPredicate, InMemoryAssetIndex, InMemoryContractDefinitionResolver,
    InMemoryPolicyDefinitionStore,
};
