//! State machine manager.
//!
//! Polls the store on a fixed interval. Each round, every processor claims
//! entities in its state via `next_not_leased` and runs on those whose
//! back-off has elapsed, up to its batch size. Entities still backing off
//! are held for the rest of the round and then released untouched.

use crate::domain::{DispatcherConfig, RetryPolicy, StoreFailure};
use crate::ports::inbound::{RetryContext, StateProcessor};
use crate::ports::outbound::StateEntityStore;
use dc_01_query_engine::Criterion;
use dc_02_state_machine::{StateCode, StateEntity};
use shared_types::TimeSource;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Outcome of one polling round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub claimed: usize,
    pub processed: usize,
    /// Held and released unchanged because back-off had not elapsed.
    pub deferred: usize,
    pub failed: usize,
}

impl TickReport {
    fn merge(&mut self, other: TickReport) {
        self.claimed += other.claimed;
        self.processed += other.processed;
        self.deferred += other.deferred;
        self.failed += other.failed;
    }
}

pub struct StateMachineManager<E: StateEntity> {
    name: String,
    store: Arc<dyn StateEntityStore<E>>,
    processors: Vec<Arc<dyn StateProcessor<E>>>,
    clock: Arc<dyn TimeSource>,
    config: DispatcherConfig,
    retry: RetryPolicy,
}

impl<E: StateEntity> StateMachineManager<E> {
    pub fn new(
        name: impl Into<String>,
        store: Arc<dyn StateEntityStore<E>>,
        clock: Arc<dyn TimeSource>,
        config: DispatcherConfig,
    ) -> Self {
        let retry = RetryPolicy::from_config(&config);
        Self {
            name: name.into(),
            store,
            processors: Vec::new(),
            clock,
            config,
            retry,
        }
    }

    pub fn with_processor(mut self, processor: Arc<dyn StateProcessor<E>>) -> Self {
        self.processors.push(processor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    /// One polling round over all processors.
    pub async fn tick(&self) -> Result<TickReport, StoreFailure> {
        let mut report = TickReport::default();
        for processor in &self.processors {
            report.merge(self.run_processor(processor.as_ref()).await?);
        }
        Ok(report)
    }

    /// Claims until `batch_size` due entities were attempted or the store
    /// has nothing left. Entities that are backing off, or that failed this
    /// round, stay leased so later claims reach past them; they are saved
    /// once the round is over.
    async fn run_processor(
        &self,
        processor: &dyn StateProcessor<E>,
    ) -> Result<TickReport, StoreFailure> {
        let state = processor.state();
        let batch_size = processor.batch_size().unwrap_or(self.config.batch_size);
        let criteria = [Criterion::eq("state", state.code())];

        let mut report = TickReport::default();
        let mut held: Vec<E> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        let outcome = self
            .claim_rounds(processor, batch_size, &criteria, &mut report, &mut held, &mut seen)
            .await;

        for entity in &held {
            self.release(entity).await;
        }
        outcome.map(|_| report)
    }

    async fn claim_rounds(
        &self,
        processor: &dyn StateProcessor<E>,
        batch_size: usize,
        criteria: &[Criterion],
        report: &mut TickReport,
        held: &mut Vec<E>,
        seen: &mut HashSet<String>,
    ) -> Result<(), StoreFailure> {
        let state = processor.state();

        loop {
            let attempted = report.processed + report.failed;
            if attempted >= batch_size {
                return Ok(());
            }
            let entities = self
                .store
                .next_not_leased(batch_size - attempted, criteria)
                .await?;
            if entities.is_empty() {
                return Ok(());
            }
            report.claimed += entities.len();

            for entity in entities {
                // already handled this round and saved back in the same state
                if !seen.insert(entity.id().to_string()) {
                    held.push(entity);
                    continue;
                }

                let now = self.clock.now();
                let attempt = entity.state_count();
                let exhausted = self.retry.is_exhausted(attempt);

                if !exhausted && !self.retry.is_due(attempt, entity.state_timestamp(), now) {
                    debug!(
                        entity_id = entity.id(),
                        state = %state,
                        attempt,
                        "[dc-03] {} backing off",
                        self.name
                    );
                    held.push(entity);
                    report.deferred += 1;
                    continue;
                }

                if exhausted {
                    warn!(
                        entity_id = entity.id(),
                        state = %state,
                        attempt,
                        "[dc-03] {} retries exhausted",
                        self.name
                    );
                }

                let retry = RetryContext { attempt, exhausted };
                match processor.process(entity.clone(), retry).await {
                    Ok(updated) => {
                        self.release(&updated).await;
                        report.processed += 1;
                    }
                    Err(err) => {
                        warn!(
                            entity_id = entity.id(),
                            state = %state,
                            error = %err,
                            "[dc-03] {} processing failed",
                            self.name
                        );
                        let mut failed = entity;
                        if let Err(err) = failed.retry_current_state(self.clock.now()) {
                            warn!(
                                entity_id = failed.id(),
                                state = %state,
                                error = %err,
                                "[dc-03] {} cannot record retry, no back-off applies",
                                self.name
                            );
                        }
                        held.push(failed);
                        report.failed += 1;
                    }
                }
            }
        }
    }

    /// Saves `entity`, which clears this handle's lease.
    async fn release(&self, entity: &E) {
        if let Err(err) = self.store.save(entity).await {
            warn!(
                entity_id = entity.id(),
                error = %err,
                "[dc-03] {} could not save {}",
                self.name,
                E::KIND
            );
        }
    }

    /// Polls until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(Duration::from_millis(self.config.interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            processors = self.processors.len(),
            interval_ms = self.config.interval_ms,
            "[dc-03] {} started",
            self.name
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = self.tick().await {
                        warn!(error = %err, "[dc-03] {} polling round failed", self.name);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("[dc-03] {} stopped", self.name);
    }

    pub fn spawn(self: Arc<Self>, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
