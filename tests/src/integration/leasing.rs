//! # Multi-Worker Leasing
//!
//! Several dispatchers sharing one negotiation table must never work on the
//! same entity at once. Handles created with `handle_for` model separate
//! workers over the same backing data.

#[cfg(test)]
mod tests {
    use futures::future::join_all;
    use std::collections::HashSet;
    use std::sync::Arc;

    use crate::integration::flows::tests::{connector, consumer_negotiation, Connector};
    use connector_runtime::handlers::negotiation_processors;
    use dc_02_state_machine::{ContractNegotiation, ContractNegotiationState as N, StateEntity};
    use dc_03_lease_store::{StateEntityStore, StateMachineManager, StoreFailure};
    use shared_types::TimeSource;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// A second dispatcher over `connector`'s table, leasing as `holder`.
    fn second_worker(
        connector: &Connector,
        holder: &str,
    ) -> StateMachineManager<ContractNegotiation> {
        let store = Arc::new(connector.container.negotiations.handle_for(holder));
        negotiation_processors(connector.remote.clone(), connector.clock.clone())
            .into_iter()
            .fold(
                StateMachineManager::new(
                    holder,
                    store,
                    connector.clock.clone(),
                    connector.container.config.dispatcher.clone(),
                ),
                StateMachineManager::with_processor,
            )
    }

    async fn seed(connector: &Connector, count: usize) {
        for i in 0..count {
            let negotiation = consumer_negotiation(&format!("n-{i:02}"), connector.clock.now());
            connector.container.negotiations.save(&negotiation).await.unwrap();
        }
    }

    // =============================================================================
    // CONTENTION
    // =============================================================================

    #[tokio::test]
    async fn test_two_workers_split_the_backlog() {
        let connector = connector("worker-a");
        seed(&connector, 10).await;
        let worker_a = connector.container.negotiation_manager();
        let worker_b = second_worker(&connector, "worker-b");

        let (a, b) = tokio::join!(worker_a.tick(), worker_b.tick());
        let (a, b) = (a.unwrap(), b.unwrap());
        // batch size 5 each
        assert_eq!(a.processed + b.processed, 10);
        assert_eq!(a.processed, 5);
        assert_eq!(b.processed, 5);

        let sent = connector.remote.sent.lock();
        let unique: HashSet<&str> = sent.iter().map(|m| m.process_id.as_str()).collect();
        assert_eq!(sent.len(), 10);
        assert_eq!(unique.len(), 10);
    }

    #[tokio::test]
    async fn test_second_round_finds_nothing_left() {
        let connector = connector("worker-a");
        seed(&connector, 3).await;
        let worker_a = connector.container.negotiation_manager();
        let worker_b = second_worker(&connector, "worker-b");

        worker_a.tick().await.unwrap();
        let report = worker_b.tick().await.unwrap();
        assert_eq!(report.claimed, 0);
        assert_eq!(connector.remote.sent.lock().len(), 3);
    }

    #[tokio::test]
    async fn test_manual_lease_blocks_dispatch_until_expiry() {
        let connector = connector("worker-a");
        seed(&connector, 1).await;
        let worker = connector.container.negotiation_manager();
        let operator = connector.container.negotiations.handle_for("operator");

        let held = operator.find_by_id_and_lease("n-00").await.unwrap();
        assert_eq!(held.state(), N::Requesting);

        let report = worker.tick().await.unwrap();
        assert_eq!(report.claimed, 0);

        // Writes from other holders are rejected while the lease is live
        let err = connector.container.negotiations.save(&held).await.unwrap_err();
        assert!(matches!(err, StoreFailure::AlreadyLeased { ref owner, .. } if owner == "operator"));
        assert_eq!(err.reason(), "ALREADY_LEASED");

        connector
            .clock
            .advance(connector.container.config.lease.lease_duration_ms + 1);
        let report = worker.tick().await.unwrap();
        assert_eq!(report.processed, 1);

        let n = operator.find_by_id("n-00").await.unwrap().unwrap();
        assert_eq!(n.state(), N::Requested);
    }

    #[tokio::test]
    async fn test_concurrent_lease_has_single_winner() {
        let connector = connector("worker-a");
        seed(&connector, 1).await;
        let handles: Vec<_> = (0..8)
            .map(|i| connector.container.negotiations.handle_for(format!("worker-{i}")))
            .collect();

        let results = join_all(handles.iter().map(|h| h.find_by_id_and_lease("n-00"))).await;

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, StoreFailure::AlreadyLeased { .. })));
    }

    #[tokio::test]
    async fn test_lease_holder_can_release_and_reacquire() {
        let connector = connector("worker-a");
        seed(&connector, 1).await;
        let store = &connector.container.negotiations;
        let other = store.handle_for("worker-b");

        let n = store.find_by_id_and_lease("n-00").await.unwrap();
        // renewing an own lease succeeds
        store.find_by_id_and_lease("n-00").await.unwrap();
        store.save(&n).await.unwrap();
        assert!(store.lease("n-00").is_none());

        other.find_by_id_and_lease("n-00").await.unwrap();
        assert_eq!(store.lease("n-00").map(|l| l.owner), Some("worker-b".to_string()));
    }
}
