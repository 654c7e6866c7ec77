//! # Outbound Ports
//!
//! The lease-based store contract. Every persistence backend implements
//! [`StateEntityStore`]; the in-memory adapter is the reference behaviour.
//!
//! A store handle acts for exactly one lease holder. Several handles over
//! the same backing data model several workers.

use crate::domain::StoreFailure;
use async_trait::async_trait;
use dc_01_query_engine::{Criterion, QuerySpec};
use dc_02_state_machine::{ContractAgreement, ContractNegotiation, StateEntity, TransferProcess};

#[async_trait]
pub trait StateEntityStore<E: StateEntity>: Send + Sync {
    /// Identity this handle leases entities for.
    fn lease_holder(&self) -> &str;

    /// Plain read. Never blocked by leases.
    async fn find_by_id(&self, id: &str) -> Result<Option<E>, StoreFailure>;

    /// Loads and leases in one step.
    ///
    /// `NotFound` if absent, `AlreadyLeased` if another holder has a live
    /// lease. A lease already held by this handle is renewed.
    async fn find_by_id_and_lease(&self, id: &str) -> Result<E, StoreFailure>;

    /// Claims up to `batch_size` unleased (or expired) entities matching
    /// `criteria`, oldest `state_timestamp` first.
    async fn next_not_leased(
        &self,
        batch_size: usize,
        criteria: &[Criterion],
    ) -> Result<Vec<E>, StoreFailure>;

    /// Upsert. Clears this handle's lease; fails with `AlreadyLeased` while
    /// another holder's lease is live.
    async fn save(&self, entity: &E) -> Result<(), StoreFailure>;

    /// Removes the entity. Absent ids succeed.
    async fn delete(&self, id: &str) -> Result<(), StoreFailure>;

    async fn query(&self, spec: &QuerySpec) -> Result<Vec<E>, StoreFailure>;

    async fn count(&self, criteria: &[Criterion]) -> Result<usize, StoreFailure>;

    /// Looks up the entity the counter-party knows by `correlation_id`.
    async fn find_for_correlation_id(
        &self,
        correlation_id: &str,
    ) -> Result<Option<E>, StoreFailure>;
}

/// Negotiation store with agreement projections.
#[async_trait]
pub trait ContractNegotiationStore: StateEntityStore<ContractNegotiation> {
    async fn find_contract_agreement(
        &self,
        agreement_id: &str,
    ) -> Result<Option<ContractAgreement>, StoreFailure>;

    /// Agreements of all stored negotiations, filtered, sorted and paged by
    /// agreement fields.
    async fn query_agreements(
        &self,
        spec: &QuerySpec,
    ) -> Result<Vec<ContractAgreement>, StoreFailure>;
}

pub trait TransferProcessStore: StateEntityStore<TransferProcess> {}
