//! # Contract Agreement
//!
//! The signed outcome of a negotiation. Immutable once created and attached
//! to its negotiation at most once.

use dc_01_query_engine::{FieldRegistry, Queryable};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use shared_types::{Policy, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAgreement {
    pub id: String,
    pub provider_id: String,
    pub consumer_id: String,
    pub contract_signing_date: Timestamp,
    pub asset_id: String,
    pub policy: Policy,
}

lazy_static! {
    static ref AGREEMENT_FIELDS: FieldRegistry<ContractAgreement> =
        FieldRegistry::<ContractAgreement>::new()
            .field("id", |a| vec![a.id.clone().into()])
            .field("providerId", |a| vec![a.provider_id.clone().into()])
            .field("consumerId", |a| vec![a.consumer_id.clone().into()])
            .field("contractSigningDate", |a| {
                vec![a.contract_signing_date.into()]
            })
            .field("assetId", |a| vec![a.asset_id.clone().into()])
            .field("policy.assigner", |a| {
                a.policy.assigner.iter().map(Into::into).collect()
            })
            .field("policy.assignee", |a| {
                a.policy.assignee.iter().map(Into::into).collect()
            })
            .field("policy.target", |a| {
                a.policy.target.iter().map(Into::into).collect()
            });
}

impl Queryable for ContractAgreement {
    fn registry() -> &'static FieldRegistry<Self> {
        &AGREEMENT_FIELDS
    }
}
