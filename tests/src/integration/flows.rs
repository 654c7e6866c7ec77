//! # Lifecycle Flows
//!
//! Drives negotiations and transfers through the runtime's dispatchers the
//! way two connectors would: each side runs its own container, protocol
//! messages are captured by a recording dispatcher, and the test plays the
//! wire by applying the counter-party's inbound transitions.
//!
//! ## Flows Tested
//!
//! 1. **Negotiation**: consumer REQUESTING through to FINALIZED on both sides
//! 2. **Retry exhaustion**: unreachable counter-party ends in TERMINATED
//! 3. **Transfer**: provisioning, request, completion and deprovisioning
//! 4. **Runtime**: spawned dispatchers advance work and stop on shutdown

#[cfg(test)]
pub(crate) mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    use connector_runtime::adapters::{RemoteError, RemoteMessage, RemoteMessageDispatcher};
    use connector_runtime::container::{ConnectorContainer, RuntimeConfig};
    use connector_runtime::ConnectorRuntime;
    use dc_02_state_machine::{
        ContractNegotiation, ContractNegotiationState as N, ProcessType, StateEntity,
        TransferProcess, TransferProcessState as T,
    };
    use dc_03_lease_store::{ContractNegotiationStore, StateEntityStore, StoreFailure};
    use shared_types::{ContractOffer, MockTimeSource, Policy, SystemTimeSource, TimeSource};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Captures every protocol message; fails while `fail` is set.
    #[derive(Default)]
    pub(crate) struct RecordingRemote {
        pub(crate) sent: Mutex<Vec<RemoteMessage>>,
        pub(crate) attempts: Mutex<usize>,
        pub(crate) fail: Mutex<bool>,
    }

    impl RecordingRemote {
        pub(crate) fn failing() -> Self {
            Self {
                fail: Mutex::new(true),
                ..Default::default()
            }
        }

        pub(crate) fn message_types(&self) -> Vec<&'static str> {
            self.sent.lock().iter().map(|m| m.message_type).collect()
        }

        pub(crate) fn last(&self) -> Option<RemoteMessage> {
            self.sent.lock().last().cloned()
        }
    }

    #[async_trait]
    impl RemoteMessageDispatcher for RecordingRemote {
        async fn dispatch(&self, message: RemoteMessage) -> Result<(), RemoteError> {
            *self.attempts.lock() += 1;
            if *self.fail.lock() {
                return Err(RemoteError::Unreachable {
                    address: message.counter_party_address,
                    reason: "connection refused".into(),
                });
            }
            self.sent.lock().push(message);
            Ok(())
        }
    }

    /// One connector: container plus the doubles it was built with.
    pub(crate) struct Connector {
        pub(crate) container: ConnectorContainer,
        pub(crate) clock: Arc<MockTimeSource>,
        pub(crate) remote: Arc<RecordingRemote>,
    }

    pub(crate) fn config(holder: &str) -> RuntimeConfig {
        let mut config = RuntimeConfig::default();
        config.lease.lease_holder = holder.to_string();
        config.dispatcher.retry_limit = 2;
        config.dispatcher.retry_base_delay_ms = 100;
        config.dispatcher.retry_max_delay_ms = 1_000;
        config
    }

    pub(crate) fn connector(holder: &str) -> Connector {
        connector_with(config(holder), RecordingRemote::default())
    }

    pub(crate) fn connector_with(config: RuntimeConfig, remote: RecordingRemote) -> Connector {
        let clock = Arc::new(MockTimeSource::new(1_700_000_000_000));
        let remote = Arc::new(remote);
        let container = ConnectorContainer::with_parts(config, clock.clone(), remote.clone());
        Connector {
            container,
            clock,
            remote,
        }
    }

    pub(crate) fn offer(asset_id: &str) -> ContractOffer {
        ContractOffer {
            id: format!("def-1:{asset_id}:offer-1"),
            asset_id: asset_id.to_string(),
            policy: Policy {
                assigner: Some("did:web:provider".into()),
                ..Default::default()
            },
        }
    }

    pub(crate) fn consumer_negotiation(id: &str, now: u64) -> ContractNegotiation {
        ContractNegotiation::builder(id, ProcessType::Consumer)
            .counter_party("did:web:provider", "http://provider/dsp")
            .protocol("dataspace-protocol-http")
            .contract_offer(offer("asset-1"))
            .state(N::Requesting)
            .build(now)
            .unwrap()
    }

    // =============================================================================
    // NEGOTIATION
    // =============================================================================

    #[tokio::test]
    async fn test_negotiation_reaches_finalized_on_both_sides() {
        let consumer = connector("consumer");
        let provider = connector("provider");
        let consumer_manager = consumer.container.negotiation_manager();
        let provider_manager = provider.container.negotiation_manager();
        let consumer_store = &consumer.container.negotiations;
        let provider_store = &provider.container.negotiations;

        // Consumer sends the request
        consumer_store
            .save(&consumer_negotiation("c-neg-1", consumer.clock.now()))
            .await
            .unwrap();
        let report = consumer_manager.tick().await.unwrap();
        assert_eq!(report.processed, 1);
        let request = consumer.remote.last().unwrap();
        assert_eq!(request.message_type, "ContractRequestMessage");
        assert_eq!(request.process_id, "c-neg-1");
        assert_eq!(request.counter_party_address, "http://provider/dsp");

        // Provider receives it and decides to agree
        let mut incoming = ContractNegotiation::builder("p-neg-1", ProcessType::Provider)
            .correlation_id(request.process_id.clone())
            .counter_party("did:web:consumer", "http://consumer/dsp")
            .protocol(request.protocol.clone())
            .contract_offer(offer("asset-1"))
            .state(N::Requested)
            .build(provider.clock.now())
            .unwrap();
        incoming.transition_agreeing(provider.clock.now()).unwrap();
        provider_store.save(&incoming).await.unwrap();

        provider_manager.tick().await.unwrap();
        let p = provider_store.find_by_id("p-neg-1").await.unwrap().unwrap();
        assert_eq!(p.state(), N::Agreed);
        let agreement = p.contract_agreement().cloned().unwrap();
        assert_eq!(agreement.provider_id, "did:web:provider");
        assert_eq!(agreement.consumer_id, "did:web:consumer");
        let sent = provider.remote.last().unwrap();
        assert_eq!(sent.message_type, "ContractAgreementMessage");
        assert_eq!(sent.correlation_id.as_deref(), Some("c-neg-1"));

        // Consumer takes the agreement and verifies
        let mut c = consumer_store.find_by_id_and_lease("c-neg-1").await.unwrap();
        c.set_contract_agreement(agreement.clone()).unwrap();
        c.transition_agreed(consumer.clock.now()).unwrap();
        c.transition_verifying(consumer.clock.now()).unwrap();
        consumer_store.save(&c).await.unwrap();

        consumer_manager.tick().await.unwrap();
        let c = consumer_store.find_by_id("c-neg-1").await.unwrap().unwrap();
        assert_eq!(c.state(), N::Verified);

        // Provider finalizes
        let mut p = provider_store.find_by_id_and_lease("p-neg-1").await.unwrap();
        p.transition_verified(provider.clock.now()).unwrap();
        p.transition_finalizing(provider.clock.now()).unwrap();
        provider_store.save(&p).await.unwrap();

        provider_manager.tick().await.unwrap();
        let p = provider_store.find_by_id("p-neg-1").await.unwrap().unwrap();
        assert_eq!(p.state(), N::Finalized);

        let mut c = consumer_store.find_by_id_and_lease("c-neg-1").await.unwrap();
        c.transition_finalized(consumer.clock.now()).unwrap();
        consumer_store.save(&c).await.unwrap();

        assert!(c.is_terminal());
        assert!(p.is_terminal());
        assert_eq!(
            consumer.remote.message_types(),
            vec!["ContractRequestMessage", "ContractAgreementVerificationMessage"]
        );
        assert_eq!(
            provider.remote.message_types(),
            vec![
                "ContractAgreementMessage",
                "ContractNegotiationEventMessage:finalized"
            ]
        );

        // Both sides hold the same agreement
        let found = consumer_store
            .find_contract_agreement(&agreement.id)
            .await
            .unwrap();
        assert_eq!(found, Some(agreement));

        // An agreed negotiation cannot be deleted
        let err = consumer_store.delete("c-neg-1").await.unwrap_err();
        assert!(matches!(err, StoreFailure::NotDeletable { .. }));
        assert_eq!(err.reason(), "CONFLICT");
    }

    #[tokio::test]
    async fn test_unreachable_counter_party_terminates_after_retries() {
        let consumer = connector_with(config("consumer"), RecordingRemote::failing());
        let manager = consumer.container.negotiation_manager();
        let store = &consumer.container.negotiations;
        store
            .save(&consumer_negotiation("c-neg-1", consumer.clock.now()))
            .await
            .unwrap();

        // attempts 1 and 2 go out immediately, then back-off applies
        assert_eq!(manager.tick().await.unwrap().failed, 1);
        assert_eq!(manager.tick().await.unwrap().failed, 1);
        assert_eq!(manager.tick().await.unwrap().deferred, 1);

        consumer.clock.advance(200);
        assert_eq!(manager.tick().await.unwrap().failed, 1);

        consumer.clock.advance(400);
        let report = manager.tick().await.unwrap();
        assert_eq!(report.processed, 1);

        let n = store.find_by_id("c-neg-1").await.unwrap().unwrap();
        assert_eq!(n.state(), N::Terminated);
        assert_eq!(
            n.error_detail(),
            Some("REQUESTING not delivered after 3 attempts")
        );
        assert_eq!(*consumer.remote.attempts.lock(), 3);
        assert!(consumer.remote.sent.lock().is_empty());
        assert!(store.lease("c-neg-1").is_none());
    }

    #[tokio::test]
    async fn test_transient_outage_recovers() {
        let consumer = connector_with(config("consumer"), RecordingRemote::failing());
        let manager = consumer.container.negotiation_manager();
        let store = &consumer.container.negotiations;
        store
            .save(&consumer_negotiation("c-neg-1", consumer.clock.now()))
            .await
            .unwrap();

        manager.tick().await.unwrap();
        *consumer.remote.fail.lock() = false;
        manager.tick().await.unwrap();

        let n = store.find_by_id("c-neg-1").await.unwrap().unwrap();
        assert_eq!(n.state(), N::Requested);
        assert_eq!(n.state_count(), 1);
        assert_eq!(*consumer.remote.attempts.lock(), 2);
    }

    // =============================================================================
    // TRANSFER
    // =============================================================================

    #[tokio::test]
    async fn test_consumer_transfer_lifecycle() {
        let consumer = connector("consumer");
        let manager = consumer.container.transfer_manager();
        let store = &consumer.container.transfers;
        let now = consumer.clock.now();

        let process = TransferProcess::builder("tp-1", ProcessType::Consumer)
            .asset_id("asset-1")
            .contract_id("agreement-1")
            .counter_party_address("http://provider/dsp")
            .protocol("dataspace-protocol-http")
            .state(T::Provisioning)
            .build(now)
            .unwrap();
        store.save(&process).await.unwrap();

        // Provisioning is local
        manager.tick().await.unwrap();
        let mut tp = store.find_by_id_and_lease("tp-1").await.unwrap();
        assert_eq!(tp.state(), T::Provisioned);
        assert!(consumer.remote.sent.lock().is_empty());

        tp.transition_requesting(now).unwrap();
        store.save(&tp).await.unwrap();
        manager.tick().await.unwrap();
        let mut tp = store.find_by_id_and_lease("tp-1").await.unwrap();
        assert_eq!(tp.state(), T::Requested);

        // Provider started the transfer; consumer completes it
        tp.transition_started(now).unwrap();
        tp.transition_completing(now).unwrap();
        store.save(&tp).await.unwrap();
        manager.tick().await.unwrap();
        let mut tp = store.find_by_id_and_lease("tp-1").await.unwrap();
        assert_eq!(tp.state(), T::Completed);

        tp.transition_deprovisioning(now).unwrap();
        store.save(&tp).await.unwrap();
        manager.tick().await.unwrap();
        let tp = store.find_by_id("tp-1").await.unwrap().unwrap();
        assert_eq!(tp.state(), T::Deprovisioned);
        assert!(tp.is_terminal());

        assert_eq!(
            consumer.remote.message_types(),
            vec!["TransferRequestMessage", "TransferCompletionMessage"]
        );
        assert!(consumer
            .remote
            .sent
            .lock()
            .iter()
            .all(|m| m.process_kind == TransferProcess::KIND));
    }

    // =============================================================================
    // RUNTIME
    // =============================================================================

    #[tokio::test]
    async fn test_runtime_dispatches_until_shutdown() {
        let mut config = config("runtime");
        config.dispatcher.interval_ms = 10;
        let remote = Arc::new(RecordingRemote::default());
        let clock: Arc<dyn TimeSource> = Arc::new(SystemTimeSource);
        let container = ConnectorContainer::with_parts(config, clock.clone(), remote.clone());
        container
            .negotiations
            .save(&consumer_negotiation("c-neg-1", clock.now()))
            .await
            .unwrap();

        let runtime = ConnectorRuntime::new(container);
        runtime.start();

        let store = runtime.container().negotiations.clone();
        let advanced = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let n = store.find_by_id("c-neg-1").await.unwrap().unwrap();
                if n.state() == N::Requested {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(advanced.is_ok(), "dispatcher never advanced the negotiation");

        tokio::time::timeout(Duration::from_secs(2), runtime.shutdown())
            .await
            .expect("shutdown timed out");
        assert_eq!(remote.message_types(), vec!["ContractRequestMessage"]);
    }
}
