//! Lineup Daemon - Main Entry Point
//! Composition root: wires the queue manager and its services behind the JSON-RPC server

mod config;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{DaemonConfig, LogFormat};
use lineup_api_rpc::{HandlerDeps, RpcServer};
use lineup_core::application::{EventBus, MatchLifecycle, QueueManager, ScopeGate, SeedService};
use lineup_core::port::id_provider::UuidProvider;
use lineup_core::port::time_provider::SystemTimeProvider;
use lineup_core::port::{IdProvider, TimeProvider};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LOG_FILE_PREFIX: &str = "lineup-daemon.log";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration, then initialize logging from it
    let config = DaemonConfig::from_env();
    let _log_guard = init_tracing(&config)?;

    for warning in &config.warnings {
        warn!(warning = %warning, "Configuration fallback");
    }
    info!("Lineup daemon v{} starting...", VERSION);
    info!(
        capacity = config.defaults.capacity,
        first_queue = %config.defaults.first_queue_name,
        prune_policy = %config.manager.prune_policy,
        gate_default_open = config.gate_default_open,
        pop_count = config.lifecycle.pop_count,
        "Configuration loaded"
    );

    // 2. Setup dependencies (DI wiring)
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let id_provider: Arc<dyn IdProvider> = Arc::new(UuidProvider);
    let manager = Arc::new(QueueManager::with_config(
        time_provider.clone(),
        config.manager.clone(),
    ));
    let bus = EventBus::new();
    let gate = Arc::new(ScopeGate::new(config.gate_default_open));

    // 3. Match lifecycle subscriptions live until shutdown
    let lifecycle = Arc::new(MatchLifecycle::new(
        manager.clone(),
        gate.clone(),
        time_provider.clone(),
        config.lifecycle.clone(),
    ));
    let subscriptions = lifecycle.attach(&bus);

    let seeds = Arc::new(SeedService::new(
        manager.clone(),
        id_provider.clone(),
        config.defaults.clone(),
    ));

    // 4. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let rpc_server = RpcServer::new(
        config.rpc.clone(),
        HandlerDeps {
            manager,
            bus,
            gate,
            seeds,
            id_provider,
            defaults: config.defaults.clone(),
            pop_count: config.lifecycle.pop_count,
        },
    );
    let (rpc_handle, addr) = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(addr = %addr, "System ready");
    info!("Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 6. Graceful shutdown
    drop(subscriptions);
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    info!("Shutdown complete.");

    Ok(())
}

/// Stdout logging (pretty or JSON) plus optional daily rolling JSON files
///
/// The returned guard flushes the file writer and must be held until exit.
fn init_tracing(config: &DaemonConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("lineup=info"))
        .context("Failed to create env filter")?;

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    match config.log_format {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    Ok(guard)
}
