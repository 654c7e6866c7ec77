//! # Outbound Ports
//!
//! Read-only collaborators consulted during resolution.

use crate::domain::{Asset, ContractDefinition, ParticipantAgent, PolicyDefinition, ResolveError};
use async_trait::async_trait;
use dc_01_query_engine::Criterion;

/// Asset catalog.
#[async_trait]
pub trait AssetIndex: Send + Sync {
    /// Number of assets matching every criterion.
    async fn count(&self, criteria: &[Criterion]) -> Result<u64, ResolveError>;

    /// Matching assets in the index's stable order, `limit` of them starting
    /// at `offset`.
    async fn query(
        &self,
        criteria: &[Criterion],
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Asset>, ResolveError>;
}

#[async_trait]
pub trait PolicyDefinitionStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<PolicyDefinition>, ResolveError>;
}

/// Maps a requester to the contract definitions it may see.
#[async_trait]
pub trait ContractDefinitionResolver: Send + Sync {
    /// Ordered and stable for the duration of one call.
    async fn definitions_for(
        &self,
        agent: &ParticipantAgent,
    ) -> Result<Vec<ContractDefinition>, ResolveError>;
}
