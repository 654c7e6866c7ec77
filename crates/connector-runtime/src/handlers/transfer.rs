//! Transfer process processors.

use super::forward::{Advance, ForwardProcessor};
use crate::adapters::ports::RemoteMessageDispatcher;
use dc_02_state_machine::{TransferProcess, TransferProcessState as T, TransitionError};
use dc_03_lease_store::StateProcessor;
use shared_types::{TimeSource, Timestamp};
use std::sync::Arc;

fn terminated(process: &mut TransferProcess, now: Timestamp) -> Result<(), TransitionError> {
    process.transition_terminated(None, now)
}

/// `(claimed state, message owed, transition after dispatch)`. Provisioning
/// steps are local and send nothing.
const STEPS: &[(T, Option<&str>, Advance<TransferProcess>)] = &[
    (T::Provisioning, None, TransferProcess::transition_provisioned),
    (T::Requesting, Some("TransferRequestMessage"), TransferProcess::transition_requested),
    (T::Starting, Some("TransferStartMessage"), TransferProcess::transition_started),
    (T::Suspending, Some("TransferSuspensionMessage"), TransferProcess::transition_suspended),
    (T::Completing, Some("TransferCompletionMessage"), TransferProcess::transition_completed),
    (T::Terminating, Some("TransferTerminationMessage"), terminated),
    (T::Deprovisioning, None, TransferProcess::transition_deprovisioned),
];

/// One processor per outbound transfer state.
pub fn transfer_processors(
    remote: Arc<dyn RemoteMessageDispatcher>,
    clock: Arc<dyn TimeSource>,
) -> Vec<Arc<dyn StateProcessor<TransferProcess>>> {
    STEPS
        .iter()
        .map(|&(state, message, advance)| {
            Arc::new(ForwardProcessor::new(
                state,
                message,
                advance,
                TransferProcess::transition_terminated,
                Arc::clone(&remote),
                Arc::clone(&clock),
            )) as Arc<dyn StateProcessor<TransferProcess>>
        })
        .collect()
}
