//! In-memory store backend.
//!
//! Rows live in a [`InMemoryTable`] shared by any number of store handles.
//! Every conditional write (lease acquisition, save, delete) runs inside one
//! `parking_lot::Mutex` critical section, the in-process equivalent of an
//! atomic conditional row update.

use crate::domain::{LeaseConfig, StoreFailure};
use crate::ports::outbound::{ContractNegotiationStore, StateEntityStore, TransferProcessStore};
use async_trait::async_trait;
use dc_01_query_engine::{CompiledQuery, Criterion, QuerySpec};
use dc_02_state_machine::{ContractAgreement, ContractNegotiation, StateEntity, TransferProcess};
use parking_lot::Mutex;
use shared_types::{Lease, TimeSource};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A stored entity plus its lease.
#[derive(Debug, Clone)]
struct Row<E> {
    entity: E,
    lease: Option<Lease>,
}

/// Backing data shared between store handles.
pub struct InMemoryTable<E> {
    rows: Arc<Mutex<HashMap<String, Row<E>>>>,
}

impl<E> InMemoryTable<E> {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Clone for InMemoryTable<E> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<E> Default for InMemoryTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// One worker's handle onto an [`InMemoryTable`].
pub struct InMemoryEntityStore<E> {
    table: InMemoryTable<E>,
    lease_holder: String,
    lease_duration_ms: u64,
    clock: Arc<dyn TimeSource>,
}

pub type InMemoryNegotiationStore = InMemoryEntityStore<ContractNegotiation>;
pub type InMemoryTransferProcessStore = InMemoryEntityStore<TransferProcess>;

impl<E: StateEntity> InMemoryEntityStore<E> {
    pub fn new(
        table: InMemoryTable<E>,
        lease_holder: impl Into<String>,
        lease_duration_ms: u64,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            table,
            lease_holder: lease_holder.into(),
            lease_duration_ms,
            clock,
        }
    }

    pub fn from_config(
        table: InMemoryTable<E>,
        config: &LeaseConfig,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self::new(
            table,
            config.lease_holder.clone(),
            config.lease_duration_ms,
            clock,
        )
    }

    /// Another handle over the same table, leasing for `lease_holder`.
    pub fn handle_for(&self, lease_holder: impl Into<String>) -> Self {
        Self::new(
            self.table.clone(),
            lease_holder,
            self.lease_duration_ms,
            Arc::clone(&self.clock),
        )
    }

    /// Current lease on `id`, expired or not.
    pub fn lease(&self, id: &str) -> Option<Lease> {
        self.table
            .rows
            .lock()
            .get(id)
            .and_then(|row| row.lease.clone())
    }

    fn new_lease(&self, now: u64) -> Lease {
        Lease::new(self.lease_holder.clone(), now, self.lease_duration_ms)
    }

    fn snapshot(&self) -> Vec<E> {
        self.table
            .rows
            .lock()
            .values()
            .map(|row| row.entity.clone())
            .collect()
    }
}

#[async_trait]
impl<E: StateEntity> StateEntityStore<E> for InMemoryEntityStore<E> {
    fn lease_holder(&self) -> &str {
        &self.lease_holder
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<E>, StoreFailure> {
        Ok(self
            .table
            .rows
            .lock()
            .get(id)
            .map(|row| row.entity.clone()))
    }

    async fn find_by_id_and_lease(&self, id: &str) -> Result<E, StoreFailure> {
        let now = self.clock.now();
        let mut rows = self.table.rows.lock();
        let row = rows.get_mut(id).ok_or_else(|| StoreFailure::NotFound {
            id: id.to_string(),
        })?;

        if let Some(lease) = row.lease.as_ref().filter(|l| l.blocks(&self.lease_holder, now)) {
            return Err(StoreFailure::AlreadyLeased {
                id: id.to_string(),
                owner: lease.owner.clone(),
            });
        }

        row.lease = Some(self.new_lease(now));
        debug!(
            entity_id = id,
            owner = %self.lease_holder,
            "[dc-03] Leased {}",
            E::KIND
        );
        Ok(row.entity.clone())
    }

    async fn next_not_leased(
        &self,
        batch_size: usize,
        criteria: &[Criterion],
    ) -> Result<Vec<E>, StoreFailure> {
        let query = CompiledQuery::<E>::filter(criteria)?;
        let now = self.clock.now();
        let mut rows = self.table.rows.lock();

        let mut candidates: Vec<(u64, String)> = rows
            .values()
            .filter(|row| row.lease.as_ref().map_or(true, |l| l.is_expired(now)))
            .filter(|row| query.matches(&row.entity))
            .map(|row| (row.entity.state_timestamp(), row.entity.id().to_string()))
            .collect();
        candidates.sort();
        candidates.truncate(batch_size);

        let mut claimed = Vec::with_capacity(candidates.len());
        for (_, id) in candidates {
            if let Some(row) = rows.get_mut(&id) {
                row.lease = Some(self.new_lease(now));
                claimed.push(row.entity.clone());
            }
        }

        if !claimed.is_empty() {
            debug!(
                owner = %self.lease_holder,
                count = claimed.len(),
                "[dc-03] Claimed {} batch",
                E::KIND
            );
        }
        Ok(claimed)
    }

    async fn save(&self, entity: &E) -> Result<(), StoreFailure> {
        let now = self.clock.now();
        let mut rows = self.table.rows.lock();

        if let Some(lease) = rows
            .get(entity.id())
            .and_then(|row| row.lease.as_ref())
            .filter(|l| l.blocks(&self.lease_holder, now))
        {
            return Err(StoreFailure::AlreadyLeased {
                id: entity.id().to_string(),
                owner: lease.owner.clone(),
            });
        }

        let mut stored = entity.clone();
        stored.stateful_mut().updated_at = now;
        rows.insert(
            entity.id().to_string(),
            Row {
                entity: stored,
                lease: None,
            },
        );
        debug!(
            entity_id = entity.id(),
            state = %entity.state(),
            "[dc-03] Saved {}",
            E::KIND
        );
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreFailure> {
        let now = self.clock.now();
        let mut rows = self.table.rows.lock();
        let Some(row) = rows.get(id) else {
            return Ok(());
        };

        if let Some(reason) = row.entity.deletion_blocker() {
            return Err(StoreFailure::NotDeletable {
                id: id.to_string(),
                reason,
            });
        }
        if let Some(lease) = row.lease.as_ref().filter(|l| !l.is_expired(now)) {
            return Err(StoreFailure::AlreadyLeased {
                id: id.to_string(),
                owner: lease.owner.clone(),
            });
        }

        rows.remove(id);
        debug!(entity_id = id, "[dc-03] Deleted {}", E::KIND);
        Ok(())
    }

    async fn query(&self, spec: &QuerySpec) -> Result<Vec<E>, StoreFailure> {
        let query = CompiledQuery::<E>::compile(spec)?;
        let mut entities = self.snapshot();
        entities.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(query.apply(&entities).into_iter().cloned().collect())
    }

    async fn count(&self, criteria: &[Criterion]) -> Result<usize, StoreFailure> {
        let query = CompiledQuery::<E>::filter(criteria)?;
        let rows = self.table.rows.lock();
        Ok(rows.values().filter(|row| query.matches(&row.entity)).count())
    }

    async fn find_for_correlation_id(
        &self,
        correlation_id: &str,
    ) -> Result<Option<E>, StoreFailure> {
        let rows = self.table.rows.lock();
        Ok(rows
            .values()
            .find(|row| row.entity.correlation_id() == Some(correlation_id))
            .map(|row| row.entity.clone()))
    }
}

#[async_trait]
impl ContractNegotiationStore for InMemoryNegotiationStore {
    async fn find_contract_agreement(
        &self,
        agreement_id: &str,
    ) -> Result<Option<ContractAgreement>, StoreFailure> {
        let rows = self.table.rows.lock();
        Ok(rows
            .values()
            .filter_map(|row| row.entity.contract_agreement())
            .find(|agreement| agreement.id == agreement_id)
            .cloned())
    }

    async fn query_agreements(
        &self,
        spec: &QuerySpec,
    ) -> Result<Vec<ContractAgreement>, StoreFailure> {
        let query = CompiledQuery::<ContractAgreement>::compile(spec)?;
        let mut agreements: Vec<ContractAgreement> = self
            .snapshot()
            .into_iter()
            .filter_map(|n| n.contract_agreement().cloned())
            .collect();
        // HashMap order is arbitrary; give unsorted queries a stable base.
        agreements.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(query.apply(&agreements).into_iter().cloned().collect())
    }
}

impl TransferProcessStore for InMemoryTransferProcessStore {}
