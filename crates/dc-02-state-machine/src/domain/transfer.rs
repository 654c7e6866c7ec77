//! # Transfer Process
//!
//! Data transfer lifecycle, from provisioning of the resources a transfer
//! needs to their deprovisioning once it is over.
//!
//! ## Lifecycle
//!
//! ```text
//! INITIAL → PROVISIONING → [PROVISIONING_REQUESTED] → PROVISIONED
//!   Consumer: → REQUESTING → REQUESTED → STARTED
//!   Provider: → STARTING → STARTED
//! STARTED ⇄ SUSPENDING/SUSPENDED, STARTED → COMPLETING → COMPLETED
//! any state before COMPLETED → TERMINATING → TERMINATED
//! COMPLETED | TERMINATED → DEPROVISIONING → [DEPROVISIONING_REQUESTED] → DEPROVISIONED
//! ```

use super::entity::StateEntity;
use super::errors::TransitionError;
use super::state::{state_codes, ProcessType, StateCode};
use super::stateful::StatefulEntity;
use super::table::{Sources, TransitionTable};
use dc_01_query_engine::{FieldRegistry, FieldValue, Queryable};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use shared_types::{CallbackAddress, DataAddress, Timestamp};
use std::collections::BTreeMap;

state_codes! {
    /// Transfer process states.
    pub enum TransferProcessState {
        Initial = 100 => "INITIAL",
        Provisioning = 200 => "PROVISIONING",
        ProvisioningRequested = 250 => "PROVISIONING_REQUESTED",
        Provisioned = 300 => "PROVISIONED",
        Requesting = 400 => "REQUESTING",
        Requested = 500 => "REQUESTED",
        Starting = 550 => "STARTING",
        Started = 600 => "STARTED",
        Suspending = 650 => "SUSPENDING",
        Suspended = 700 => "SUSPENDED",
        Completing = 750 => "COMPLETING",
        Completed = 800 => "COMPLETED",
        Terminating = 825 => "TERMINATING",
        Terminated = 850 => "TERMINATED",
        Deprovisioning = 900 => "DEPROVISIONING",
        DeprovisioningRequested = 950 => "DEPROVISIONING_REQUESTED",
        Deprovisioned = 1000 => "DEPROVISIONED",
    }
    terminal: [Deprovisioned]
}

use ProcessType::{Consumer, Provider};
use TransferProcessState as T;

/// Any state before COMPLETED, plus TERMINATING itself.
fn terminable(from: TransferProcessState) -> bool {
    from.code() < T::Completed.code() || from == T::Terminating
}

lazy_static! {
    static ref TRANSFER_TRANSITIONS: TransitionTable<TransferProcessState> =
        TransitionTable::new()
            .allow(T::Provisioning, &[T::Initial, T::Provisioning])
            .allow(
                T::ProvisioningRequested,
                &[T::Provisioning, T::ProvisioningRequested],
            )
            .allow(
                T::Provisioned,
                &[T::Provisioning, T::ProvisioningRequested, T::Provisioned],
            )
            .allow_for(T::Requesting, Consumer, &[T::Provisioned, T::Requesting])
            .allow_for(T::Requested, Consumer, &[T::Requesting, T::Requested])
            .allow_for(
                T::Starting,
                Provider,
                &[T::Provisioned, T::Starting, T::Suspended],
            )
            .allow_for(
                T::Started,
                Consumer,
                &[T::Requested, T::Started, T::Suspended],
            )
            .allow_for(T::Started, Provider, &[T::Starting, T::Started])
            .allow(T::Suspending, &[T::Started, T::Suspending])
            .allow(T::Suspended, &[T::Started, T::Suspending, T::Suspended])
            .allow(T::Completing, &[T::Started, T::Completing])
            .allow(T::Completed, &[T::Started, T::Completing, T::Completed])
            .rule(T::Terminating, None, Sources::Predicate(terminable))
            .rule(T::Terminated, None, Sources::Predicate(terminable))
            .allow(
                T::Deprovisioning,
                &[T::Completed, T::Terminated, T::Deprovisioning],
            )
            .allow(
                T::DeprovisioningRequested,
                &[T::Deprovisioning, T::DeprovisioningRequested],
            )
            .allow(
                T::Deprovisioned,
                &[T::Deprovisioning, T::DeprovisioningRequested],
            );
}

// =============================================================================
// RESOURCES
// =============================================================================

/// A resource the transfer needs before data can flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    pub id: String,
    /// Provisioner-specific kind (e.g. `s3-bucket`).
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceManifest {
    pub definitions: Vec<ResourceDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedResource {
    pub id: String,
    pub resource_definition_id: String,
    /// Set for resources that act as the transfer's content address.
    pub data_address: Option<DataAddress>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeprovisionedResource {
    pub provisioned_resource_id: String,
    /// Deprovisioning started but has not been confirmed.
    pub in_process: bool,
    pub error_message: Option<String>,
}

// =============================================================================
// TRANSFER PROCESS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferProcess {
    #[serde(flatten)]
    stateful: StatefulEntity<TransferProcessState>,
    #[serde(rename = "type")]
    transfer_type: ProcessType,
    correlation_id: Option<String>,
    pub asset_id: String,
    pub contract_id: String,
    pub protocol: String,
    pub counter_party_address: String,
    data_address: Option<DataAddress>,
    pub resource_manifest: ResourceManifest,
    provisioned_resources: Vec<ProvisionedResource>,
    deprovisioned_resources: Vec<DeprovisionedResource>,
    pub callback_addresses: Vec<CallbackAddress>,
    pub private_properties: BTreeMap<String, String>,
}

impl TransferProcess {
    pub fn builder(id: impl Into<String>, transfer_type: ProcessType) -> TransferProcessBuilder {
        TransferProcessBuilder::new(id, transfer_type)
    }

    pub fn table() -> &'static TransitionTable<TransferProcessState> {
        &TRANSFER_TRANSITIONS
    }

    pub fn transfer_type(&self) -> ProcessType {
        self.transfer_type
    }

    pub fn data_address(&self) -> Option<&DataAddress> {
        self.data_address.as_ref()
    }

    pub fn set_data_address(&mut self, address: DataAddress) {
        self.data_address = Some(address);
    }

    pub fn provisioned_resources(&self) -> &[ProvisionedResource] {
        &self.provisioned_resources
    }

    pub fn deprovisioned_resources(&self) -> &[DeprovisionedResource] {
        &self.deprovisioned_resources
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.stateful.error_detail.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.stateful.is_terminal()
    }

    /// Records a provisioned resource. A resource carrying a data address
    /// becomes the transfer's content address.
    pub fn add_provisioned_resource(&mut self, resource: ProvisionedResource) {
        if let Some(address) = &resource.data_address {
            self.data_address = Some(address.clone());
        }
        self.provisioned_resources.push(resource);
    }

    /// Records a deprovision result, replacing an earlier in-process record
    /// for the same resource.
    pub fn add_deprovisioned_resource(&mut self, resource: DeprovisionedResource) {
        self.deprovisioned_resources
            .retain(|r| r.provisioned_resource_id != resource.provisioned_resource_id);
        self.deprovisioned_resources.push(resource);
    }

    /// Every manifest definition has a provisioned resource.
    pub fn provisioning_complete(&self) -> bool {
        self.resource_manifest.definitions.iter().all(|definition| {
            self.provisioned_resources
                .iter()
                .any(|r| r.resource_definition_id == definition.id)
        })
    }

    /// Every provisioned resource has a finished deprovision record.
    pub fn deprovisioning_complete(&self) -> bool {
        self.provisioned_resources.iter().all(|provisioned| {
            self.deprovisioned_resources
                .iter()
                .any(|d| d.provisioned_resource_id == provisioned.id && !d.in_process)
        })
    }

    pub fn update_state_timestamp(&mut self, now: Timestamp) {
        self.stateful.update_state_timestamp(now);
    }

    pub fn transition_to(
        &mut self,
        target: TransferProcessState,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        TRANSFER_TRANSITIONS.apply(&mut self.stateful, self.transfer_type, target, now)
    }

    pub fn transition_provisioning(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(T::Provisioning, now)
    }

    pub fn transition_provisioning_requested(
        &mut self,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        self.transition_to(T::ProvisioningRequested, now)
    }

    pub fn transition_provisioned(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(T::Provisioned, now)
    }

    pub fn transition_requesting(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(T::Requesting, now)
    }

    pub fn transition_requested(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(T::Requested, now)
    }

    pub fn transition_starting(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(T::Starting, now)
    }

    pub fn transition_started(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(T::Started, now)
    }

    pub fn transition_suspending(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(T::Suspending, now)
    }

    pub fn transition_suspended(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(T::Suspended, now)
    }

    pub fn transition_completing(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(T::Completing, now)
    }

    pub fn transition_completed(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(T::Completed, now)
    }

    pub fn transition_terminating(
        &mut self,
        error_detail: Option<String>,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        self.transition_to(T::Terminating, now)?;
        if error_detail.is_some() {
            self.stateful.error_detail = error_detail;
        }
        Ok(())
    }

    pub fn transition_terminated(
        &mut self,
        error_detail: Option<String>,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        self.transition_to(T::Terminated, now)?;
        if error_detail.is_some() {
            self.stateful.error_detail = error_detail;
        }
        Ok(())
    }

    pub fn transition_deprovisioning(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(T::Deprovisioning, now)
    }

    pub fn transition_deprovisioning_requested(
        &mut self,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        self.transition_to(T::DeprovisioningRequested, now)
    }

    pub fn transition_deprovisioned(&mut self, now: Timestamp) -> Result<(), TransitionError> {
        self.transition_to(T::Deprovisioned, now)
    }
}

impl StateEntity for TransferProcess {
    type State = TransferProcessState;

    const KIND: &'static str = "TransferProcess";

    fn transition_table() -> &'static TransitionTable<TransferProcessState> {
        &TRANSFER_TRANSITIONS
    }

    fn stateful(&self) -> &StatefulEntity<TransferProcessState> {
        &self.stateful
    }

    fn stateful_mut(&mut self) -> &mut StatefulEntity<TransferProcessState> {
        &mut self.stateful
    }

    fn process_type(&self) -> ProcessType {
        self.transfer_type
    }

    fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}

// =============================================================================
// BUILDER
// =============================================================================

#[derive(Debug, Clone)]
pub struct TransferProcessBuilder {
    id: String,
    transfer_type: ProcessType,
    state: TransferProcessState,
    correlation_id: Option<String>,
    asset_id: String,
    contract_id: String,
    protocol: String,
    counter_party_address: String,
    data_address: Option<DataAddress>,
    resource_manifest: ResourceManifest,
    callback_addresses: Vec<CallbackAddress>,
    private_properties: BTreeMap<String, String>,
}

impl TransferProcessBuilder {
    pub fn new(id: impl Into<String>, transfer_type: ProcessType) -> Self {
        Self {
            id: id.into(),
            transfer_type,
            state: T::Initial,
            correlation_id: None,
            asset_id: String::new(),
            contract_id: String::new(),
            protocol: String::new(),
            counter_party_address: String::new(),
            data_address: None,
            resource_manifest: ResourceManifest::default(),
            callback_addresses: Vec::new(),
            private_properties: BTreeMap::new(),
        }
    }

    pub fn correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn asset_id(mut self, asset_id: impl Into<String>) -> Self {
        self.asset_id = asset_id.into();
        self
    }

    pub fn contract_id(mut self, contract_id: impl Into<String>) -> Self {
        self.contract_id = contract_id.into();
        self
    }

    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    pub fn counter_party_address(mut self, address: impl Into<String>) -> Self {
        self.counter_party_address = address.into();
        self
    }

    pub fn data_address(mut self, address: DataAddress) -> Self {
        self.data_address = Some(address);
        self
    }

    pub fn resource(mut self, definition: ResourceDefinition) -> Self {
        self.resource_manifest.definitions.push(definition);
        self
    }

    pub fn callback_address(mut self, address: CallbackAddress) -> Self {
        self.callback_addresses.push(address);
        self
    }

    pub fn private_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.private_properties.insert(key.into(), value.into());
        self
    }

    pub fn state(mut self, state: TransferProcessState) -> Self {
        self.state = state;
        self
    }

    pub fn build(self, now: Timestamp) -> Result<TransferProcess, TransitionError> {
        if self.transfer_type == Provider && self.correlation_id.is_none() {
            return Err(TransitionError::MissingCorrelationId {
                kind: TransferProcess::KIND,
                entity_id: self.id,
            });
        }
        Ok(TransferProcess {
            stateful: StatefulEntity::new(self.id, self.state, now),
            transfer_type: self.transfer_type,
            correlation_id: self.correlation_id,
            asset_id: self.asset_id,
            contract_id: self.contract_id,
            protocol: self.protocol,
            counter_party_address: self.counter_party_address,
            data_address: self.data_address,
            resource_manifest: self.resource_manifest,
            provisioned_resources: Vec::new(),
            deprovisioned_resources: Vec::new(),
            callback_addresses: self.callback_addresses,
            private_properties: self.private_properties,
        })
    }
}

// =============================================================================
// QUERYABLE FIELDS
// =============================================================================

/// `privateProperties.<key>` paths resolve against the property map.
fn private_property(t: &TransferProcess, path: &str) -> Vec<FieldValue> {
    path.strip_prefix("privateProperties.")
        .and_then(|key| t.private_properties.get(key))
        .map(Into::into)
        .into_iter()
        .collect()
}

lazy_static! {
    static ref TRANSFER_FIELDS: FieldRegistry<TransferProcess> =
        FieldRegistry::<TransferProcess>::new()
            .field("id", |t| vec![t.stateful.id.clone().into()])
            .field("state", |t| vec![t.stateful.state.code().into()])
            .field("stateCount", |t| vec![t.stateful.state_count.into()])
            .field("stateTimestamp", |t| vec![t.stateful.state_timestamp.into()])
            .field("createdAt", |t| vec![t.stateful.created_at.into()])
            .field("updatedAt", |t| vec![t.stateful.updated_at.into()])
            .field("type", |t| vec![t.transfer_type.as_str().into()])
            .field("correlationId", |t| {
                t.correlation_id.iter().map(Into::into).collect()
            })
            .field("assetId", |t| vec![t.asset_id.clone().into()])
            .field("contractId", |t| vec![t.contract_id.clone().into()])
            .field("protocol", |t| vec![t.protocol.clone().into()])
            .field("counterPartyAddress", |t| {
                vec![t.counter_party_address.clone().into()]
            })
            .field("dataAddress.type", |t| {
                t.data_address.iter().map(|a| a.kind.clone().into()).collect()
            })
            .field("resourceManifest.definitions.id", |t| {
                t.resource_manifest
                    .definitions
                    .iter()
                    .map(|d| d.id.clone().into())
                    .collect()
            })
            .field("provisionedResourceSet.resources.id", |t| {
                t.provisioned_resources
                    .iter()
                    .map(|r| r.id.clone().into())
                    .collect()
            })
            .dynamic("privateProperties.", private_property);
}

impl Queryable for TransferProcess {
    fn registry() -> &'static FieldRegistry<Self> {
        &TRANSFER_FIELDS
    }
}
