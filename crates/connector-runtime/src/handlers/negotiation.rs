//! Contract negotiation processors.

use super::forward::{Advance, ForwardProcessor};
use crate::adapters::ports::RemoteMessageDispatcher;
use dc_02_state_machine::{
    ContractAgreement, ContractNegotiation, ContractNegotiationState as N, TransitionError,
};
use dc_03_lease_store::StateProcessor;
use shared_types::{TimeSource, Timestamp};
use std::sync::Arc;

/// Provider side: derives the agreement from the last offer, then moves to
/// AGREED.
fn agree(negotiation: &mut ContractNegotiation, now: Timestamp) -> Result<(), TransitionError> {
    if negotiation.contract_agreement().is_none() {
        if let Some(offer) = negotiation.last_contract_offer().cloned() {
            let agreement = ContractAgreement {
                id: uuid::Uuid::new_v4().to_string(),
                provider_id: offer.policy.assigner.clone().unwrap_or_default(),
                consumer_id: negotiation.counter_party_id.clone(),
                contract_signing_date: now,
                asset_id: offer.asset_id,
                policy: offer.policy,
            };
            negotiation.set_contract_agreement(agreement)?;
        }
    }
    negotiation.transition_agreed(now)
}

fn terminated(negotiation: &mut ContractNegotiation, now: Timestamp) -> Result<(), TransitionError> {
    negotiation.transition_terminated(None, now)
}

/// `(claimed state, message owed, transition after dispatch)`.
const STEPS: &[(N, &str, Advance<ContractNegotiation>)] = &[
    (N::Requesting, "ContractRequestMessage", ContractNegotiation::transition_requested),
    (N::Offering, "ContractOfferMessage", ContractNegotiation::transition_offered),
    (
        N::Accepting,
        "ContractNegotiationEventMessage:accepted",
        ContractNegotiation::transition_accepted,
    ),
    (N::Agreeing, "ContractAgreementMessage", agree),
    (
        N::Verifying,
        "ContractAgreementVerificationMessage",
        ContractNegotiation::transition_verified,
    ),
    (
        N::Finalizing,
        "ContractNegotiationEventMessage:finalized",
        ContractNegotiation::transition_finalized,
    ),
    (N::Terminating, "ContractNegotiationTerminationMessage", terminated),
];

/// One processor per outbound negotiation state.
pub fn negotiation_processors(
    remote: Arc<dyn RemoteMessageDispatcher>,
    clock: Arc<dyn TimeSource>,
) -> Vec<Arc<dyn StateProcessor<ContractNegotiation>>> {
    STEPS
        .iter()
        .map(|&(state, message, advance)| {
            Arc::new(ForwardProcessor::new(
                state,
                Some(message),
                advance,
                ContractNegotiation::transition_terminated,
                Arc::clone(&remote),
                Arc::clone(&clock),
            )) as Arc<dyn StateProcessor<ContractNegotiation>>
        })
        .collect()
}
