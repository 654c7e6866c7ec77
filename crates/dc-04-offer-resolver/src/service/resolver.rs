//! Contract offer resolver.
//!
//! Pages through the concatenation of every visible definition's matching
//! assets. Definitions that end before the window only cost a count query;
//! their assets and policies are never loaded.

use crate::algorithms::plan_slice;
use crate::domain::{
    Asset, ContractDefinition, Dataset, MissingPolicyMode, OfferRange, OfferRequest,
    PolicyDefinition, ResolveError, ResolverConfig,
};
use crate::ports::inbound::OfferResolverApi;
use crate::ports::outbound::{AssetIndex, ContractDefinitionResolver, PolicyDefinitionStore};
use async_trait::async_trait;
use shared_types::{ContractOffer, TimeSource, Timestamp};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

pub struct ContractOfferResolver {
    definitions: Arc<dyn ContractDefinitionResolver>,
    assets: Arc<dyn AssetIndex>,
    policies: Arc<dyn PolicyDefinitionStore>,
    clock: Arc<dyn TimeSource>,
    config: ResolverConfig,
}

impl ContractOfferResolver {
    pub fn new(
        definitions: Arc<dyn ContractDefinitionResolver>,
        assets: Arc<dyn AssetIndex>,
        policies: Arc<dyn PolicyDefinitionStore>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self::with_config(definitions, assets, policies, clock, ResolverConfig::default())
    }

    pub fn with_config(
        definitions: Arc<dyn ContractDefinitionResolver>,
        assets: Arc<dyn AssetIndex>,
        policies: Arc<dyn PolicyDefinitionStore>,
        clock: Arc<dyn TimeSource>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            definitions,
            assets,
            policies,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    fn build_dataset(
        definition: &ContractDefinition,
        policy: &PolicyDefinition,
        asset: Asset,
        now: Timestamp,
    ) -> Dataset {
        let offer = ContractOffer {
            id: format!("{}:{}:{}", definition.id, asset.id, Uuid::new_v4()),
            asset_id: asset.id.clone(),
            policy: policy.policy.with_target(asset.id.clone()),
        };
        Dataset {
            offer,
            asset,
            definition_id: definition.id.clone(),
            contract_start: now,
            contract_end: now.saturating_add(definition.validity.saturating_mul(1_000)),
        }
    }
}

#[async_trait]
impl OfferResolverApi for ContractOfferResolver {
    async fn query_datasets(&self, request: &OfferRequest) -> Result<Vec<Dataset>, ResolveError> {
        let range = request
            .range
            .unwrap_or_else(|| OfferRange::first(self.config.default_page_size));
        let target = range.size();
        if target == 0 {
            return Ok(Vec::new());
        }

        // One clock read per request keeps start/end aligned across the page.
        let now = self.clock.now();
        let definitions = self.definitions.definitions_for(&request.agent).await?;

        let mut datasets = Vec::new();
        let mut running_total = 0u64;
        let mut collected = 0u64;

        for definition in &definitions {
            if collected >= target {
                break;
            }

            let criteria = definition.asset_criteria(&request.asset_criteria);
            let available = self.assets.count(&criteria).await?;

            let Some(slice) = plan_slice(&range, running_total, available, collected) else {
                running_total += available;
                continue;
            };

            let assets = self
                .assets
                .query(&criteria, slice.offset, slice.limit)
                .await?;

            match self
                .policies
                .find_by_id(&definition.contract_policy_id)
                .await?
            {
                Some(policy) => {
                    let emitted = assets.len() as u64;
                    datasets.extend(
                        assets
                            .into_iter()
                            .map(|asset| Self::build_dataset(definition, &policy, asset, now)),
                    );
                    collected += emitted;
                }
                None => {
                    warn!(
                        definition_id = %definition.id,
                        policy_id = %definition.contract_policy_id,
                        skipped = assets.len(),
                        "[dc-04] Contract policy not found, no offers for definition"
                    );
                    if self.config.missing_policy == MissingPolicyMode::ReserveSlice {
                        collected += slice.limit;
                    }
                }
            }
            running_total += available;
        }

        debug!(
            agent = %request.agent.id,
            from = range.from(),
            to = range.to(),
            definitions = definitions.len(),
            returned = datasets.len(),
            "[dc-04] Resolved datasets"
        );
        Ok(datasets)
    }
}
