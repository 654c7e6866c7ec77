//! # Dataspace Connector Runtime
//!
//! Wires the contract lifecycle subsystems into one process.
//!
//! ## Modular Structure
//!
//! - `container/` - configuration and the subsystem container
//! - `adapters/` - remote dispatch port and its logging adapter
//! - `handlers/` - state processors registered with the dispatchers
//!
//! ## Startup Sequence
//!
//! 1. Load `RuntimeConfig` from the environment and validate it
//! 2. Initialize logging
//! 3. Build stores, resolver and dispatchers
//! 4. Spawn the negotiation and transfer dispatchers
//! 5. Run until Ctrl-C, then signal shutdown and wait for the loops

pub mod adapters;
pub mod container;
pub mod handlers;

use crate::container::ConnectorContainer;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub struct ConnectorRuntime {
    container: Arc<ConnectorContainer>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ConnectorRuntime {
    pub fn new(container: ConnectorContainer) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            container: Arc::new(container),
            shutdown_tx,
            shutdown_rx,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Spawns both dispatchers. Must run inside a Tokio runtime.
    pub fn start(&self) {
        info!("===========================================");
        info!("  Dataspace Connector Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let negotiations = Arc::new(self.container.negotiation_manager());
        let transfers = Arc::new(self.container.transfer_manager());

        let mut tasks = self.tasks.lock();
        tasks.push(negotiations.spawn(self.shutdown_rx.clone()));
        tasks.push(transfers.spawn(self.shutdown_rx.clone()));

        info!(
            interval_ms = self.container.config.dispatcher.interval_ms,
            batch_size = self.container.config.dispatcher.batch_size,
            "Dispatchers started"
        );
    }

    /// Signals shutdown and waits for every dispatcher loop to return.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let tasks = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            if let Err(e) = task.await {
                error!("Dispatcher task failed: {}", e);
            }
        }

        info!("Shutdown complete");
    }

    pub fn container(&self) -> Arc<ConnectorContainer> {
        Arc::clone(&self.container)
    }
}
