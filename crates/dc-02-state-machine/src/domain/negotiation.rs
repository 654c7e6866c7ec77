//! # Contract Negotiation
//!
//! Consumer and provider sides of the contract negotiation protocol.
//!
//! ## Lifecycle
//!
//! ```text
//! Consumer: INITIAL → REQUESTING → REQUESTED → (OFFERED → ACCEPTING → ACCEPTED)
//!           → AGREED → VERIFYING → VERIFIED → FINALIZED
//! Provider: INITIAL → REQUESTED → (OFFERING → OFFERED → ACCEPTED)
//!           → AGREEING → AGREED → VERIFIED → FINALIZING → FINALIZED
//! Either:   any non-terminal → TERMINATING → TERMINATED
//! ```

use super::agreement::ContractAgreement;
use super::entity::StateEntity;
use super::errors::TransitionError;
use super::state::{state_codes, ProcessType, StateCode};
use super::stateful::StatefulEntity;
use super::table::{Sources, TransitionTable};
use dc_01_query_engine::{FieldRegistry, FieldValue, Queryable};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use shared_types::{CallbackAddress, ContractOffer, Timestamp};

state_codes! {
    /// Contract negotiation states.
    pub enum ContractNegotiationState {
        Initial = 50 => "INITIAL",
        Requesting = 100 => "REQUESTING",
        Requested = 200 => "REQUESTED",
        Offering = 300 => "OFFERING",
        Offered = 400 => "OFFERED",
        Accepting = 700 => "ACCEPTING",
        Accepted = 800 => "ACCEPTED",
        Agreeing = 900 => "AGREEING",
        Agreed = 1000 => "AGREED",
        Verifying = 1050 => "VERIFYING",
        Verified = 1100 => "VERIFIED",
        Finalizing = 1150 => "FINALIZING",
        Finalized = 1200 => "FINALIZED",
        Terminating = 1300 => "TERMINATING",
        Terminated = 1400 => "TERMINATED",
    }
    terminal: [Finalized, Terminated]
}

use ContractNegotiationState as N;
use ProcessType::{Consumer, Provider};

lazy_static! {
    static ref NEGOTIATION_TRANSITIONS: TransitionTable<ContractNegotiationState> =
        TransitionTable::new()
            .allow_for(N::Requesting, Consumer, &[N::Initial, N::Requesting, N::Offered])
            .allow_for(N::Requested, Consumer, &[N::Requesting, N::Requested])
            .allow_for(N::Requested, Provider, &[N::Initial, N::Requested, N::Offered])
            .allow_for(N::Offering, Provider, &[N::Requested, N::Offering])
            .allow_for(N::Offered, Consumer, &[N::Initial, N::Requested, N::Offered])
            .allow_for(N::Offered, Provider, &[N::Offering, N::Offered])
            .allow_for(N::Accepting, Consumer, &[N::Offered, N::Accepting])
            .allow_for(N::Accepted, Consumer, &[N::Accepting, N::Accepted])
            .allow_for(N::Accepted, Provider, &[N::Offered, N::Accepted])
            .allow_for(N::Agreeing, Provider, &[N::Requested, N::Accepted, N::Agreeing])
            .allow_for(N::Agreed, Consumer, &[N::Requested, N::Accepted, N::Agreed])
            .allow_for(N::Agreed, Provider, &[N::Agreeing, N::Agreed])
            .allow_for(N::Verifying, Consumer, &[N::Agreed, N::Verifying])
            .allow_for(N::Verified, Consumer, &[N::Verifying, N::Verified])
            .allow_for(N::Verified, Provider, &[N::Agreed, N::Verified])
            .allow_for(N::Finalizing, Provider, &[N::Verified, N::Finalizing])
            .allow_for(N::Finalized, Consumer, &[N::Verified])
            .allow_for(N::Finalized, Provider, &[N::Finalizing])
            .rule(N::Terminating, None, Sources::NonTerminal)
            .rule(N::Terminated, None, Sources::NonTerminal);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractNegotiation {
    #[serde(flatten)]
    stateful: StatefulEntity<ContractNegotiationState>,
    #[serde(rename = "type")]
    negotiation_type: ProcessType,
    correlation_id: Option<String>,
    pub counter_party_id: String,
    pub counter_party_address: String,
    pub protocol: String,
    contract_offers: Vec<ContractOffer>,
    contract_agreement: Option<ContractAgreement>,
    pub callback_addresses: Vec<CallbackAddress>,
}

impl ContractNegotiation {
    pub fn builder(id: impl Into<String>, negotiation_type: ProcessType) -> ContractNegotiationBuilder {
        ContractNegotiationBuilder::new(id, negotiation_type)
    }

    pub fn table() -> &'static TransitionTable<ContractNegotiationState> {
        &NEGOTIATION_TRANSITIONS
    }

    pub fn negotiation_type(&self) -> ProcessType {
        self.negotiation_type
    }

    pub fn contract_offers(&self) -> &[ContractOffer] {
        &self.contract_offers
    }

    pub fn last_contract_offer(&self) -> Option<&ContractOffer> {
        self.contract_offers.last()
    }

    pub fn contract_agreement(&self) -> Option<&ContractAgreement> {
        self.contract_agreement.as_ref()
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.stateful.error_detail.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.stateful.is_terminal()
    }

    /// Appends an offer. Offers are never removed or reordered.
    pub fn add_contract_offer(&mut self, offer: ContractOffer) {
        self.contract_offers.push(offer);
    }

    /// Attaches the agreement. Fails if one is already attached.
    pub fn set_contract_agreement(
        &mut self,
        agreement: ContractAgreement,
    ) -> Result<(), TransitionError> {
        if self.contract_agreement.is_some() {
            return Err(TransitionError::AgreementAlreadySet {
                entity_id: self.stateful.id.clone(),
            });
        }
        self.contract_agreement = Some(agreement);
        Ok(())
    }

    pub fn update_state_timestamp(&mut self, now: Timestamp) {
        self.stateful.update_state_timestamp(now);
    }

    /// Generic transition entry point; the named methods below delegate here.
    pub fn transition_to(
        &mut self,
        target: ContractNegotiationState,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        NEGOTIATION_TRANSITIONS.apply(&mut self.stateful, self.negotiation_type, target, now)
    }

    pub fn transition_requesting(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(N::Requesting, now)
    }

    pub fn transition_requested(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(N::Requested, now)
    }

    pub fn transition_offering(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(N::Offering, now)
    }

    pub fn transition_offered(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(N::Offered, now)
    }

    pub fn transition_accepting(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(N::Accepting, now)
    }

    pub fn transition_accepted(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(N::Accepted, now)
    }

    pub fn transition_agreeing(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(N::Agreeing, now)
    }

    pub fn transition_agreed(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(N::Agreed, now)
    }

    pub fn transition_verifying(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(N::Verifying, now)
    }

    pub fn transition_verified(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(N::Verified, now)
    }

    pub fn transition_finalizing(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(N::Finalizing, now)
    }

    pub fn transition_finalized(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(N::Finalized, now)
    }

    pub fn transition_terminating(
        &mut self,
        error_detail: Option<String>,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        self.terminate_into(N::Terminating, error_detail, now)
    }

    pub fn transition_terminated(
        &mut self,
        error_detail: Option<String>,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        self.terminate_into(N::Terminated, error_detail, now)
    }

    fn terminate_into(
        &mut self,
        target: ContractNegotiationState,
        error_detail: Option<String>,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        self.transition_to(target, now)?;
        if error_detail.is_some() {
            self.stateful.error_detail = error_detail;
        }
        Ok(())
    }
}

impl StateEntity for ContractNegotiation {
    type State = ContractNegotiationState;

    const KIND: &'static str = "ContractNegotiation";

    fn transition_table() -> &'static TransitionTable<ContractNegotiationState> {
        &NEGOTIATION_TRANSITIONS
    }

    fn stateful(&self) -> &StatefulEntity<ContractNegotiationState> {
        &self.stateful
    }

    fn stateful_mut(&mut self) -> &mut StatefulEntity<ContractNegotiationState> {
        &mut self.stateful
    }

    fn process_type(&self) -> ProcessType {
        self.negotiation_type
    }

    fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    fn deletion_blocker(&self) -> Option<String> {
        self.contract_agreement.as_ref().map(|agreement| {
            format!(
                "ContractNegotiation {} has contract agreement {} and cannot be deleted",
                self.stateful.id, agreement.id
            )
        })
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builder for [`ContractNegotiation`]. Enforces the provider correlation id.
#[derive(Debug, Clone)]
pub struct ContractNegotiationBuilder {
    id: String,
    negotiation_type: ProcessType,
    state: ContractNegotiationState,
    correlation_id: Option<String>,
    counter_party_id: String,
    counter_party_address: String,
    protocol: String,
    contract_offers: Vec<ContractOffer>,
    callback_addresses: Vec<CallbackAddress>,
}

impl ContractNegotiationBuilder {
    pub fn new(id: impl Into<String>, negotiation_type: ProcessType) -> Self {
        Self {
            id: id.into(),
            negotiation_type,
            state: N::Initial,
            correlation_id: None,
            counter_party_id: String::new(),
            counter_party_address: String::new(),
            protocol: String::new(),
            contract_offers: Vec::new(),
            callback_addresses: Vec::new(),
        }
    }

    pub fn correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn counter_party(mut self, id: impl Into<String>, address: impl Into<String>) -> Self {
        self.counter_party_id = id.into();
        self.counter_party_address = address.into();
        self
    }

    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    pub fn contract_offer(mut self, offer: ContractOffer) -> Self {
        self.contract_offers.push(offer);
        self
    }

    pub fn callback_address(mut self, address: CallbackAddress) -> Self {
        self.callback_addresses.push(address);
        self
    }

    /// Starting state; only used to rehydrate or seed test fixtures.
    pub fn state(mut self, state: ContractNegotiationState) -> Self {
        self.state = state;
        self
    }

    pub fn build(self, now: Timestamp) -> Result<ContractNegotiation, TransitionError> {
        if self.negotiation_type == Provider && self.correlation_id.is_none() {
            return Err(TransitionError::MissingCorrelationId {
                kind: ContractNegotiation::KIND,
                entity_id: self.id,
            });
        }
        Ok(ContractNegotiation {
            stateful: StatefulEntity::new(self.id, self.state, now),
            negotiation_type: self.negotiation_type,
            correlation_id: self.correlation_id,
            counter_party_id: self.counter_party_id,
            counter_party_address: self.counter_party_address,
            protocol: self.protocol,
            contract_offers: self.contract_offers,
            contract_agreement: None,
            callback_addresses: self.callback_addresses,
        })
    }
}

// =============================================================================
// QUERYABLE FIELDS
// =============================================================================

fn opt(value: &Option<String>) -> Vec<FieldValue> {
    value.iter().map(Into::into).collect()
}

lazy_static! {
    static ref NEGOTIATION_FIELDS: FieldRegistry<ContractNegotiation> =
        FieldRegistry::<ContractNegotiation>::new()
            .field("id", |n| vec![n.stateful.id.clone().into()])
            .field("state", |n| vec![n.stateful.state.code().into()])
            .field("stateCount", |n| vec![n.stateful.state_count.into()])
            .field("stateTimestamp", |n| vec![n.stateful.state_timestamp.into()])
            .field("createdAt", |n| vec![n.stateful.created_at.into()])
            .field("updatedAt", |n| vec![n.stateful.updated_at.into()])
            .field("errorDetail", |n| opt(&n.stateful.error_detail))
            .field("type", |n| vec![n.negotiation_type.as_str().into()])
            .field("correlationId", |n| opt(&n.correlation_id))
            .field("counterPartyId", |n| vec![n.counter_party_id.clone().into()])
            .field("counterPartyAddress", |n| {
                vec![n.counter_party_address.clone().into()]
            })
            .field("protocol", |n| vec![n.protocol.clone().into()])
            .field("contractOffers.id", |n| {
                n.contract_offers.iter().map(|o| o.id.clone().into()).collect()
            })
            .field("contractOffers.assetId", |n| {
                n.contract_offers
                    .iter()
                    .map(|o| o.asset_id.clone().into())
                    .collect()
            })
            .field("contractAgreement.id", |n| {
                n.contract_agreement.iter().map(|a| a.id.clone().into()).collect()
            })
            .field("contractAgreement.assetId", |n| {
                n.contract_agreement
                    .iter()
                    .map(|a| a.asset_id.clone().into())
                    .collect()
            })
            .field("contractAgreement.providerId", |n| {
                n.contract_agreement
                    .iter()
                    .map(|a| a.provider_id.clone().into())
                    .collect()
            })
            .field("contractAgreement.consumerId", |n| {
                n.contract_agreement
                    .iter()
                    .map(|a| a.consumer_id.clone().into())
                    .collect()
            })
            .field("contractAgreement.contractSigningDate", |n| {
                n.contract_agreement
                    .iter()
                    .map(|a| a.contract_signing_date.into())
                    .collect()
            })
            .field("callbackAddresses.uri", |n| {
                n.callback_addresses
                    .iter()
                    .map(|c| c.uri.clone().into())
                    .collect()
            });
}

impl Queryable for ContractNegotiation {
    fn registry() -> &'static FieldRegistry<Self> {
        &NEGOTIATION_FIELDS
    }
}
