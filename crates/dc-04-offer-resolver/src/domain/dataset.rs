//! # Requests and Resolved Datasets

use super::asset::Asset;
use super::errors::ResolveError;
use dc_01_query_engine::Criterion;
use serde::{Deserialize, Serialize};
use shared_types::{ContractOffer, Timestamp};
use std::collections::BTreeMap;

/// Authenticated requester. Opaque to the resolver; definition sources use
/// it to decide visibility.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParticipantAgent {
    pub id: String,
    #[serde(default)]
    pub claims: BTreeMap<String, String>,
}

impl ParticipantAgent {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            claims: BTreeMap::new(),
        }
    }

    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.insert(key.into(), value.into());
        self
    }

    pub fn claim(&self, key: &str) -> Option<&str> {
        self.claims.get(key).map(String::as_str)
    }
}

/// Global result window `[from, to)` across all definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferRange {
    from: u64,
    to: u64,
}

impl OfferRange {
    pub fn new(from: u64, to: u64) -> Result<Self, ResolveError> {
        if from > to {
            return Err(ResolveError::InvalidRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// `[0, size)`.
    pub fn first(size: u64) -> Self {
        Self { from: 0, to: size }
    }

    pub fn from(&self) -> u64 {
        self.from
    }

    pub fn to(&self) -> u64 {
        self.to
    }

    pub fn size(&self) -> u64 {
        self.to - self.from
    }
}

/// A catalog request.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferRequest {
    pub agent: ParticipantAgent,
    /// `None` asks for the configured default page.
    pub range: Option<OfferRange>,
    /// Applied on top of every definition's asset selector.
    pub asset_criteria: Vec<Criterion>,
}

impl OfferRequest {
    pub fn new(agent: ParticipantAgent) -> Self {
        Self {
            agent,
            range: None,
            asset_criteria: Vec::new(),
        }
    }

    pub fn with_range(mut self, range: OfferRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.asset_criteria.push(criterion);
        self
    }
}

/// One resolved offer: an asset under a definition's contract policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub offer: ContractOffer,
    pub asset: Asset,
    pub definition_id: String,
    pub contract_start: Timestamp,
    pub contract_end: Timestamp,
}
