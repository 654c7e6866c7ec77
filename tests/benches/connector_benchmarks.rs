//! # Dataspace Connector Benchmarks
//!
//! | Subsystem | Operation | Scales with |
//! |-----------|-----------|-------------|
//! | dc-01 Query Engine | filter + sort + page | collection size |
//! | dc-03 Lease Store | `next_not_leased` claim | table size |
//! | dc-04 Offer Resolver | windowed `query_datasets` | definitions x assets |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;

use dc_01_query_engine::{execute, Criterion as Filter, QuerySpec, SortOrder};
use dc_02_state_machine::{ContractNegotiation, ContractNegotiationState, ProcessType, StateCode};
use dc_03_lease_store::{
    InMemoryEntityStore, InMemoryNegotiationStore, InMemoryTable, StateEntityStore,
};
use dc_04_offer_resolver::{
    Asset, ContractDefinition, ContractOfferResolver, InMemoryAssetIndex,
    InMemoryContractDefinitionResolver, InMemoryPolicyDefinitionStore, OfferRange, OfferRequest,
    OfferResolverApi, ParticipantAgent, PolicyDefinition,
};
use shared_types::{MockTimeSource, Policy};

fn assets(n: usize) -> Vec<Asset> {
    (0..n)
        .map(|i| {
            Asset::new(format!("asset-{i:06}"))
                .with_property("region", if i % 3 == 0 { "eu" } else { "us" })
                .with_property("name", format!("dataset {i}"))
        })
        .collect()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

// ============================================================================
// DC-01: Query Engine
// ============================================================================

fn bench_query_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("dc-01-query-engine");
    group.measurement_time(Duration::from_secs(5));

    let spec = QuerySpec::builder()
        .filter(Filter::eq("region", "eu"))
        .filter(Filter::like("name", "dataset 1%"))
        .sort("id", SortOrder::Desc)
        .limit(50)
        .build();

    for size in [1_000, 10_000, 50_000] {
        let items = assets(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("filter_sort_page", size),
            &items,
            |b, items| b.iter(|| black_box(execute(items.iter(), &spec).unwrap().len())),
        );
    }

    group.finish();
}

// ============================================================================
// DC-03: Lease Store
// ============================================================================

fn bench_lease_claims(c: &mut Criterion) {
    let mut group = c.benchmark_group("dc-03-lease-store");
    let rt = runtime();
    let criteria = [Filter::eq("state", ContractNegotiationState::Requesting.code())];

    for size in [100, 1_000, 10_000] {
        let clock = Arc::new(MockTimeSource::new(1_000));
        let store: InMemoryNegotiationStore =
            InMemoryEntityStore::new(InMemoryTable::new(), "bench", 60_000, clock.clone());
        rt.block_on(async {
            for i in 0..size {
                let id = format!("n-{i:06}");
                let negotiation = ContractNegotiation::builder(id, ProcessType::Consumer)
                    .state(ContractNegotiationState::Requesting)
                    .build(i as u64)
                    .unwrap();
                store.save(&negotiation).await.unwrap();
            }
        });

        group.bench_with_input(
            BenchmarkId::new("next_not_leased", size),
            &store,
            |b, store| {
                b.iter(|| {
                    // leases from the previous iteration expire
                    clock.advance(60_001);
                    let claimed = rt.block_on(store.next_not_leased(10, &criteria)).unwrap();
                    black_box(claimed.len())
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// DC-04: Offer Resolver
// ============================================================================

fn bench_offer_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("dc-04-offer-resolver");
    let rt = runtime();

    for definitions in [1, 10, 50] {
        let index = Arc::new(InMemoryAssetIndex::new());
        for asset in assets(5_000) {
            index.upsert(asset);
        }
        let policies = Arc::new(InMemoryPolicyDefinitionStore::new());
        policies.upsert(PolicyDefinition::new("contract", Policy::default()));
        let resolver_definitions = Arc::new(InMemoryContractDefinitionResolver::new());
        for d in 0..definitions {
            resolver_definitions.upsert(
                ContractDefinition::new(format!("def-{d}"), "access", "contract")
                    .with_selector(Filter::eq("region", "eu")),
            );
        }
        let resolver = ContractOfferResolver::new(
            resolver_definitions,
            index,
            policies,
            Arc::new(MockTimeSource::new(0)),
        );
        let request = OfferRequest::new(ParticipantAgent::new("bench"))
            .with_range(OfferRange::new(1_600, 1_700).unwrap());

        group.bench_with_input(
            BenchmarkId::new("window_100", definitions),
            &request,
            |b, request| {
                b.iter(|| {
                    let datasets = rt.block_on(resolver.query_datasets(request)).unwrap();
                    black_box(datasets.len())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_query_engine,
    bench_lease_claims,
    bench_offer_resolution
);
criterion_main!(benches);
