//! # Shared Domain Entities
//!
//! ## Clusters
//!
//! - **Policy**: `Policy`, opaque to this core (evaluation happens elsewhere)
//! - **Addressing**: `DataAddress`, `CallbackAddress`
//! - **Contracts**: `ContractOffer`

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// CLUSTER A: POLICY
// =============================================================================

/// An ODRL-style usage policy.
///
/// Rules are carried as raw JSON: constraint semantics belong to the policy
/// engine, not to the lifecycle core.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Policy {
    /// Asset the policy is bound to, once it becomes part of an offer.
    pub target: Option<String>,
    /// Party granting the policy.
    pub assigner: Option<String>,
    /// Party the policy is granted to.
    pub assignee: Option<String>,
    pub permissions: Vec<serde_json::Value>,
    pub prohibitions: Vec<serde_json::Value>,
    pub obligations: Vec<serde_json::Value>,
    pub extensible_properties: BTreeMap<String, serde_json::Value>,
}

impl Policy {
    /// Copy of this policy bound to `target`.
    pub fn with_target(&self, target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..self.clone()
        }
    }
}

// =============================================================================
// CLUSTER B: ADDRESSING
// =============================================================================

/// Where and how data is physically reached.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DataAddress {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: BTreeMap<String, String>,
}

impl DataAddress {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Endpoint notified about lifecycle events of a process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackAddress {
    pub uri: String,
    /// Event names the endpoint subscribed to (e.g. `contract.negotiation`).
    pub events: BTreeSet<String>,
    /// Whether the callback must succeed for the transition to be kept.
    pub transactional: bool,
}

// =============================================================================
// CLUSTER C: CONTRACTS
// =============================================================================

/// A policy offered for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractOffer {
    pub id: String,
    pub asset_id: String,
    pub policy: Policy,
}
