//! In-memory collaborators.
//!
//! Reference backends for the outbound ports, used by the runtime and by
//! tests. Assets keep insertion order, which is the stable order paging
//! relies on.

use crate::domain::{Asset, ContractDefinition, ParticipantAgent, PolicyDefinition, ResolveError};
use crate::ports::outbound::{AssetIndex, ContractDefinitionResolver, PolicyDefinitionStore};
use async_trait::async_trait;
use dc_01_query_engine::{count, execute, Criterion, QuerySpec};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

// =============================================================================
// ASSET INDEX
// =============================================================================

#[derive(Default)]
pub struct InMemoryAssetIndex {
    assets: RwLock<Vec<Asset>>,
}

impl InMemoryAssetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `asset`, replacing one with the same id in place.
    pub fn upsert(&self, asset: Asset) {
        let mut assets = self.assets.write();
        match assets.iter_mut().find(|a| a.id == asset.id) {
            Some(existing) => *existing = asset,
            None => assets.push(asset),
        }
    }

    pub fn remove(&self, id: &str) -> Option<Asset> {
        let mut assets = self.assets.write();
        let index = assets.iter().position(|a| a.id == id)?;
        Some(assets.remove(index))
    }

    pub fn len(&self) -> usize {
        self.assets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AssetIndex for InMemoryAssetIndex {
    async fn count(&self, criteria: &[Criterion]) -> Result<u64, ResolveError> {
        let assets = self.assets.read();
        Ok(count(assets.iter(), criteria)? as u64)
    }

    async fn query(
        &self,
        criteria: &[Criterion],
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Asset>, ResolveError> {
        let spec = QuerySpec::builder()
            .filters(criteria.iter().cloned())
            .offset(to_usize(offset))
            .limit(to_usize(limit))
            .build();
        let assets = self.assets.read();
        let page = execute(assets.iter(), &spec)?;
        Ok(page.into_iter().cloned().collect())
    }
}

// =============================================================================
// POLICY DEFINITION STORE
// =============================================================================

#[derive(Default)]
pub struct InMemoryPolicyDefinitionStore {
    policies: RwLock<HashMap<String, PolicyDefinition>>,
}

impl InMemoryPolicyDefinitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, definition: PolicyDefinition) {
        self.policies
            .write()
            .insert(definition.id.clone(), definition);
    }

    pub fn remove(&self, id: &str) -> Option<PolicyDefinition> {
        self.policies.write().remove(id)
    }
}

#[async_trait]
impl PolicyDefinitionStore for InMemoryPolicyDefinitionStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<PolicyDefinition>, ResolveError> {
        Ok(self.policies.read().get(id).cloned())
    }
}

// =============================================================================
// CONTRACT DEFINITIONS
// =============================================================================

/// Decides whether an agent may see a definition.
pub type AccessPredicate =
    Arc<dyn Fn(&ParticipantAgent, &ContractDefinition) -> bool + Send + Sync>;

/// Definition source filtering by a pluggable access predicate. Definitions
/// come back in insertion order.
pub struct InMemoryContractDefinitionResolver {
    definitions: RwLock<Vec<ContractDefinition>>,
    access: AccessPredicate,
}

impl InMemoryContractDefinitionResolver {
    /// Every agent sees every definition.
    pub fn new() -> Self {
        Self::with_access(Arc::new(|_: &ParticipantAgent, _: &ContractDefinition| true))
    }

    pub fn with_access(access: AccessPredicate) -> Self {
        Self {
            definitions: RwLock::new(Vec::new()),
            access,
        }
    }

    pub fn upsert(&self, definition: ContractDefinition) {
        let mut definitions = self.definitions.write();
        match definitions.iter_mut().find(|d| d.id == definition.id) {
            Some(existing) => *existing = definition,
            None => definitions.push(definition),
        }
    }
}

impl Default for InMemoryContractDefinitionResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContractDefinitionResolver for InMemoryContractDefinitionResolver {
    async fn definitions_for(
        &self,
        agent: &ParticipantAgent,
    ) -> Result<Vec<ContractDefinition>, ResolveError> {
        let visible: Vec<ContractDefinition> = self
            .definitions
            .read()
            .iter()
            .filter(|d| (self.access)(agent, d))
            .cloned()
            .collect();
        debug!(
            agent = %agent.id,
            visible = visible.len(),
            "[dc-04] Resolved contract definitions"
        );
        Ok(visible)
    }
}
