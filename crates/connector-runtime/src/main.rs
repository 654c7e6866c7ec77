//! # Dataspace Connector
//!
//! Entry point: configuration, logging, runtime, Ctrl-C.

use anyhow::{Context, Result};
use connector_runtime::container::{ConnectorContainer, RuntimeConfig};
use connector_runtime::ConnectorRuntime;
use connector_telemetry::init_logging;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env();
    config.validate().context("Invalid configuration")?;
    init_logging(&config.telemetry).context("Failed to initialize logging")?;

    let runtime = ConnectorRuntime::new(ConnectorContainer::new(config));
    runtime.start();

    info!("Connector is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await;
    Ok(())
}
