//! # Catalog and Agreements
//!
//! Offer resolution over the container's in-memory asset, policy and
//! definition stores, the negotiation it feeds, and agreement queries over
//! the negotiations that concluded.

#[cfg(test)]
mod tests {
    use crate::integration::flows::tests::{connector, Connector};
    use dc_01_query_engine::{Criterion, QueryError, QuerySpec, SortOrder};
    use dc_02_state_machine::{
        ContractAgreement, ContractNegotiation, ContractNegotiationState as N, ProcessType,
        StateCode, StateEntity,
    };
    use dc_03_lease_store::{ContractNegotiationStore, StateEntityStore, StoreFailure};
    use dc_04_offer_resolver::{
        Asset, ContractDefinition, OfferRange, OfferRequest, OfferResolverApi, ParticipantAgent,
        PolicyDefinition,
    };
    use shared_types::{DataAddress, Policy, TimeSource};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const REGIONS: [(&str, &str); 6] = [
        ("a-1", "eu"),
        ("a-2", "us"),
        ("a-3", "eu"),
        ("a-4", "eu"),
        ("a-5", "us"),
        ("a-6", "eu"),
    ];

    /// Provider catalog: one definition per region, both under the same
    /// contract policy.
    fn provider() -> Connector {
        let provider = connector("provider");
        let container = &provider.container;

        for (id, region) in REGIONS {
            let address = DataAddress::new("HttpData").with_property("baseUrl", "http://data");
            container.assets.upsert(
                Asset::new(id)
                    .with_property("region", region)
                    .with_data_address(address),
            );
        }
        container
            .policies
            .upsert(PolicyDefinition::new("access-1", Policy::default()));
        container.policies.upsert(PolicyDefinition::new(
            "contract-1",
            Policy {
                assigner: Some("did:web:provider".into()),
                ..Default::default()
            },
        ));
        for region in ["eu", "us"] {
            container.definitions.upsert(
                ContractDefinition::new(format!("def-{region}"), "access-1", "contract-1")
                    .with_selector(Criterion::eq("region", region))
                    .with_validity(3_600),
            );
        }
        provider
    }

    fn agent() -> ParticipantAgent {
        ParticipantAgent::new("did:web:consumer").with_claim("region", "eu")
    }

    fn agreement(id: &str, asset_id: &str, signed_at: u64) -> ContractAgreement {
        ContractAgreement {
            id: id.to_string(),
            provider_id: "did:web:provider".into(),
            consumer_id: "did:web:consumer".into(),
            contract_signing_date: signed_at,
            asset_id: asset_id.to_string(),
            policy: Policy::default().with_target(asset_id),
        }
    }

    async fn seed_agreed(connector: &Connector, id: &str, agreement: ContractAgreement) {
        let mut negotiation = ContractNegotiation::builder(id, ProcessType::Provider)
            .correlation_id(format!("consumer-{id}"))
            .counter_party("did:web:consumer", "http://consumer/dsp")
            .state(N::Agreed)
            .build(connector.clock.now())
            .unwrap();
        negotiation.set_contract_agreement(agreement).unwrap();
        connector.container.negotiations.save(&negotiation).await.unwrap();
    }

    // =============================================================================
    // OFFER RESOLUTION
    // =============================================================================

    #[tokio::test]
    async fn test_window_spans_definitions() {
        let provider = provider();
        let request = OfferRequest::new(agent()).with_range(OfferRange::new(3, 6).unwrap());

        let datasets = provider.container.resolver.query_datasets(&request).await.unwrap();

        let ids: Vec<(&str, &str)> = datasets
            .iter()
            .map(|d| (d.definition_id.as_str(), d.asset.id.as_str()))
            .collect();
        assert_eq!(ids, vec![("def-eu", "a-6"), ("def-us", "a-2"), ("def-us", "a-5")]);
    }

    #[tokio::test]
    async fn test_offers_carry_policy_and_validity() {
        let provider = provider();
        let now = provider.clock.now();
        let request = OfferRequest::new(agent()).with_criterion(Criterion::eq("id", "a-3"));

        let datasets = provider.container.resolver.query_datasets(&request).await.unwrap();

        assert_eq!(datasets.len(), 1);
        let dataset = &datasets[0];
        assert!(dataset.offer.id.starts_with("def-eu:a-3:"));
        assert_eq!(dataset.offer.asset_id, "a-3");
        assert_eq!(dataset.offer.policy.target.as_deref(), Some("a-3"));
        assert_eq!(dataset.offer.policy.assigner.as_deref(), Some("did:web:provider"));
        assert_eq!(dataset.contract_start, now);
        assert_eq!(dataset.contract_end, now + 3_600_000);
        assert_eq!(
            dataset.asset.data_address.as_ref().map(|a| a.kind.as_str()),
            Some("HttpData")
        );
    }

    #[tokio::test]
    async fn test_missing_contract_policy_skips_definition() {
        let provider = provider();
        provider.container.definitions.upsert(
            ContractDefinition::new("def-eu", "access-1", "contract-gone")
                .with_selector(Criterion::eq("region", "eu")),
        );

        let datasets = provider
            .container
            .resolver
            .query_datasets(&OfferRequest::new(agent()))
            .await
            .unwrap();

        let ids: Vec<&str> = datasets.iter().map(|d| d.asset.id.as_str()).collect();
        assert_eq!(ids, vec!["a-2", "a-5"]);
    }

    #[tokio::test]
    async fn test_resolved_offer_starts_negotiation() {
        let provider = provider();
        let consumer = connector("consumer");
        let datasets = provider
            .container
            .resolver
            .query_datasets(&OfferRequest::new(agent()).with_range(OfferRange::first(1)))
            .await
            .unwrap();
        let offer = datasets[0].offer.clone();

        let negotiation = ContractNegotiation::builder("c-neg-1", ProcessType::Consumer)
            .counter_party("did:web:provider", "http://provider/dsp")
            .protocol("dataspace-protocol-http")
            .contract_offer(offer.clone())
            .state(N::Requesting)
            .build(consumer.clock.now())
            .unwrap();
        consumer.container.negotiations.save(&negotiation).await.unwrap();
        consumer.container.negotiation_manager().tick().await.unwrap();

        let n = consumer
            .container
            .negotiations
            .find_by_id("c-neg-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(n.state(), N::Requested);
        assert_eq!(n.last_contract_offer(), Some(&offer));
    }

    // =============================================================================
    // AGREEMENT QUERIES
    // =============================================================================

    #[tokio::test]
    async fn test_query_agreements_by_asset() {
        let provider = provider();
        seed_agreed(&provider, "p-1", agreement("ag-1", "a-1", 100)).await;
        seed_agreed(&provider, "p-2", agreement("ag-2", "a-2", 200)).await;
        seed_agreed(&provider, "p-3", agreement("ag-3", "a-1", 300)).await;

        let spec = QuerySpec::builder()
            .filter(Criterion::eq("assetId", "a-1"))
            .sort("contractSigningDate", SortOrder::Desc)
            .build();
        let found = provider
            .container
            .negotiations
            .query_agreements(&spec)
            .await
            .unwrap();

        let ids: Vec<&str> = found.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["ag-3", "ag-1"]);

        let by_target = QuerySpec::builder()
            .filter(Criterion::eq("policy.target", "a-2"))
            .build();
        let found = provider
            .container
            .negotiations
            .query_agreements(&by_target)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "ag-2");
    }

    #[tokio::test]
    async fn test_agreement_paging_is_stable() {
        let provider = provider();
        for i in 0..5 {
            let signed = agreement(&format!("ag-{i}"), "a-1", 100);
            seed_agreed(&provider, &format!("p-{i}"), signed).await;
        }

        let page = QuerySpec::builder().offset(1).limit(2).build();
        let found = provider
            .container
            .negotiations
            .query_agreements(&page)
            .await
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["ag-1", "ag-2"]);
    }

    #[tokio::test]
    async fn test_unknown_sort_field_is_illegal_argument() {
        let provider = provider();
        seed_agreed(&provider, "p-1", agreement("ag-1", "a-1", 100)).await;

        let spec = QuerySpec::builder().sort("signedBy", SortOrder::Asc).build();
        let err = provider
            .container
            .negotiations
            .query_agreements(&spec)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreFailure::IllegalArgument(QueryError::UnsupportedSortField { .. })
        ));
        assert_eq!(err.reason(), "ILLEGAL_ARGUMENT");
    }

    #[tokio::test]
    async fn test_negotiation_query_filters_by_state_name_and_counter_party() {
        let provider = provider();
        seed_agreed(&provider, "p-1", agreement("ag-1", "a-1", 100)).await;
        let requested = ContractNegotiation::builder("p-2", ProcessType::Provider)
            .correlation_id("consumer-p-2")
            .counter_party("did:web:other", "http://other/dsp")
            .state(N::Requested)
            .build(provider.clock.now())
            .unwrap();
        provider.container.negotiations.save(&requested).await.unwrap();

        let agreed = QuerySpec::builder()
            .filter(Criterion::eq("state", N::Agreed.code()))
            .build();
        let found = provider.container.negotiations.query(&agreed).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), "p-1");

        let other = [Criterion::eq("counterPartyId", "did:web:other")];
        assert_eq!(provider.container.negotiations.count(&other).await.unwrap(), 1);
    }
}
