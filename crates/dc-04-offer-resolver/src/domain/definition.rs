//! # Contract and Policy Definitions

use dc_01_query_engine::Criterion;
use serde::{Deserialize, Serialize};
use shared_types::{Policy, Timestamp};

/// Binds a set of assets, selected by criteria, to an access policy and a
/// contract policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDefinition {
    pub id: String,
    /// Decides who sees the definition.
    pub access_policy_id: String,
    /// Attached to every offer derived from the definition.
    pub contract_policy_id: String,
    #[serde(default)]
    pub assets_selector: Vec<Criterion>,
    /// Offer validity in seconds.
    pub validity: u64,
}

impl ContractDefinition {
    pub fn new(
        id: impl Into<String>,
        access_policy_id: impl Into<String>,
        contract_policy_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            access_policy_id: access_policy_id.into(),
            contract_policy_id: contract_policy_id.into(),
            assets_selector: Vec::new(),
            validity: 0,
        }
    }

    pub fn with_selector(mut self, criterion: Criterion) -> Self {
        self.assets_selector.push(criterion);
        self
    }

    pub fn with_validity(mut self, seconds: u64) -> Self {
        self.validity = seconds;
        self
    }

    /// Selector plus caller-supplied criteria.
    pub fn asset_criteria(&self, extra: &[Criterion]) -> Vec<Criterion> {
        self.assets_selector
            .iter()
            .chain(extra)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDefinition {
    pub id: String,
    pub policy: Policy,
    #[serde(default)]
    pub created_at: Timestamp,
}

impl PolicyDefinition {
    pub fn new(id: impl Into<String>, policy: Policy) -> Self {
        Self {
            id: id.into(),
            policy,
            created_at: 0,
        }
    }
}
