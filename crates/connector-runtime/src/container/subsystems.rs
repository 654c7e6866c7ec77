//! # Connector Container
//!
//! Builds every subsystem once and hands out shared references. The
//! negotiation and transfer tables are the only mutable state; every store
//! handle and dispatcher works through them.

use super::config::RuntimeConfig;
use crate::adapters::{LoggingRemoteDispatcher, RemoteMessageDispatcher};
use crate::handlers::{negotiation_processors, transfer_processors};
use dc_02_state_machine::{ContractNegotiation, StateEntity, TransferProcess};
use dc_03_lease_store::{
    InMemoryEntityStore, InMemoryNegotiationStore, InMemoryTable, InMemoryTransferProcessStore,
    StateMachineManager, StateProcessor,
};
use dc_04_offer_resolver::{
    ContractOfferResolver, InMemoryAssetIndex, InMemoryContractDefinitionResolver,
    InMemoryPolicyDefinitionStore,
};
use shared_types::{SystemTimeSource, TimeSource};
use std::sync::Arc;
use tracing::info;

pub struct ConnectorContainer {
    pub config: RuntimeConfig,
    pub clock: Arc<dyn TimeSource>,
    pub remote: Arc<dyn RemoteMessageDispatcher>,

    pub negotiations: Arc<InMemoryNegotiationStore>,
    pub transfers: Arc<InMemoryTransferProcessStore>,

    pub assets: Arc<InMemoryAssetIndex>,
    pub policies: Arc<InMemoryPolicyDefinitionStore>,
    pub definitions: Arc<InMemoryContractDefinitionResolver>,
    pub resolver: Arc<ContractOfferResolver>,
}

impl ConnectorContainer {
    /// Wall clock and the logging remote dispatcher.
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_parts(
            config,
            Arc::new(SystemTimeSource),
            Arc::new(LoggingRemoteDispatcher::new()),
        )
    }

    pub fn with_parts(
        config: RuntimeConfig,
        clock: Arc<dyn TimeSource>,
        remote: Arc<dyn RemoteMessageDispatcher>,
    ) -> Self {
        let negotiations = Arc::new(InMemoryEntityStore::from_config(
            InMemoryTable::new(),
            &config.lease,
            Arc::clone(&clock),
        ));
        let transfers = Arc::new(InMemoryEntityStore::from_config(
            InMemoryTable::new(),
            &config.lease,
            Arc::clone(&clock),
        ));

        let assets = Arc::new(InMemoryAssetIndex::new());
        let policies = Arc::new(InMemoryPolicyDefinitionStore::new());
        let definitions = Arc::new(InMemoryContractDefinitionResolver::new());
        let resolver = Arc::new(ContractOfferResolver::with_config(
            definitions.clone(),
            assets.clone(),
            policies.clone(),
            Arc::clone(&clock),
            config.resolver.clone(),
        ));

        info!(
            lease_holder = %config.lease.lease_holder,
            lease_duration_ms = config.lease.lease_duration_ms,
            "[runtime] Container initialized"
        );

        Self {
            config,
            clock,
            remote,
            negotiations,
            transfers,
            assets,
            policies,
            definitions,
            resolver,
        }
    }

    pub fn negotiation_manager(&self) -> StateMachineManager<ContractNegotiation> {
        let processors = negotiation_processors(Arc::clone(&self.remote), Arc::clone(&self.clock));
        self.manager(self.negotiations.clone(), processors)
    }

    pub fn transfer_manager(&self) -> StateMachineManager<TransferProcess> {
        let processors = transfer_processors(Arc::clone(&self.remote), Arc::clone(&self.clock));
        self.manager(self.transfers.clone(), processors)
    }

    fn manager<E: StateEntity>(
        &self,
        store: Arc<InMemoryEntityStore<E>>,
        processors: Vec<Arc<dyn StateProcessor<E>>>,
    ) -> StateMachineManager<E> {
        processors.into_iter().fold(
            StateMachineManager::new(
                E::KIND,
                store,
                Arc::clone(&self.clock),
                self.config.dispatcher.clone(),
            ),
            StateMachineManager::with_processor,
        )
    }
}
