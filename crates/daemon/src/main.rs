//! Batchpace Daemon - Main Entry Point
//! JSON-RPC server + rate-limited batch dispatcher

mod config;
mod telemetry;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use batchpace_api_rpc::RpcServer;
use batchpace_core::application::{shutdown_channel, IngestService};
use batchpace_core::infrastructure::InMemoryJobStore;
use batchpace_core::port::id_provider::UuidProvider;
use batchpace_core::port::time_provider::SystemTimeProvider;
use batchpace_core::port::ItemProcessor;
use batchpace_infra_system::http_processor::DEFAULT_REQUEST_TIMEOUT;
use batchpace_infra_system::{HttpFetchProcessor, SimulatedFetchProcessor};
use config::{DaemonConfig, ProcessorConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration and initialize logging
    let config = DaemonConfig::from_env()?;
    telemetry::init_tracing(config.log_format)?;

    info!("Batchpace daemon v{} starting...", VERSION);

    // 2. Setup dependencies (DI wiring)
    let processor: Arc<dyn ItemProcessor> = match &config.processor {
        ProcessorConfig::Simulated { latency } => {
            info!(latency_ms = latency.as_millis() as u64, "Using simulated item processor");
            Arc::new(SimulatedFetchProcessor::new(*latency))
        }
        ProcessorConfig::Http { url_template } => {
            info!(url_template = %url_template, "Using HTTP item processor");
            Arc::new(
                HttpFetchProcessor::new(url_template.clone(), DEFAULT_REQUEST_TIMEOUT)
                    .map_err(|e| anyhow::anyhow!("HTTP processor setup failed: {}", e))?,
            )
        }
    };

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let service = Arc::new(IngestService::with_processor(
        Arc::new(InMemoryJobStore::new()),
        processor,
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
        Some(shutdown_rx),
    ));

    // 3. Start JSON-RPC server
    let rpc_server = RpcServer::new(config.rpc.clone(), Arc::clone(&service));
    let (addr, rpc_handle) = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(addr = %addr, "System ready. Waiting for submissions...");
    info!("Press Ctrl+C to shutdown");

    // 4. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 5. Graceful shutdown: stop intake, then let the current batch finish
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    shutdown_tx.shutdown();

    let dispatcher = Arc::clone(service.dispatcher());
    let drained = tokio::time::timeout(SHUTDOWN_GRACE, async move {
        while dispatcher.is_running() {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    })
    .await;
    if drained.is_err() {
        tracing::warn!(
            pending = service.scheduler().len(),
            "Dispatcher still busy after grace period"
        );
    }

    info!(pending = service.scheduler().len(), "Shutdown complete.");

    Ok(())
}
