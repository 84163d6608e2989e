//! Booking-code lockout service.
//!
//! # Architecture Overview
//!
//! ```text
//!   verification endpoint (other process)
//!        │  GET  /v1/subjects/{id}/lockout
//!        │  POST /v1/subjects/{id}/failures
//!        │  DELETE /v1/subjects/{id}/failures
//!        ▼
//!   ┌─────────┐    ┌──────────────┐    ┌──────────────┐
//!   │  http   │───▶│ LockoutGuard │───▶│ AttemptStore │
//!   │ server  │    │ policy+clock │    │ (DashMap)    │
//!   └─────────┘    └──────────────┘    └──────┬───────┘
//!                                             │ flush
//!   ┌──────────┐                              ▼
//!   │ sweeper  │──── evict idle ────▶   JSON snapshot
//!   └──────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use booking_lockout::config::{load_config, validation::validate_config, GuardConfig};
use booking_lockout::lifecycle::{wait_for_signal, Shutdown};
use booking_lockout::observability::{logging, metrics};
use booking_lockout::store::{EvictionSweeper, MemoryStore};
use booking_lockout::{HttpServer, LockoutGuard};

#[derive(Parser)]
#[command(name = "booking-lockout")]
#[command(about = "Brute-force lockout guard for booking-code verification", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let config = GuardConfig::default();
            validate_config(&config).map_err(|errors| {
                format!("default configuration invalid: {} errors", errors.len())
            })?;
            config
        }
    };

    logging::init(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "booking-lockout starting");

    let policy = config.policy.to_policy();
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_attempts = policy.max_attempts,
        lockout_secs = policy.lockout_duration.as_secs(),
        failure_mode = ?config.store.failure_mode,
        admin_enabled = config.admin.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let store = match &config.store.persistence_path {
        Some(path) => MemoryStore::load_from_file(path)?,
        None => MemoryStore::new(None),
    };
    let guard = LockoutGuard::new(Arc::new(store), policy);

    let shutdown = Shutdown::new();

    let sweeper = EvictionSweeper::new(
        guard.clone(),
        Duration::from_secs(config.store.sweep_interval_secs),
    );
    let sweeper_handle = tokio::spawn(sweeper.run(shutdown.subscribe()));

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(&config, guard.clone());
    let served = server.run(listener, shutdown.subscribe()).await;

    shutdown.trigger();
    let _ = sweeper_handle.await;

    if let Err(e) = guard.flush() {
        tracing::error!(error = %e, "Failed to write final attempt snapshot");
    }

    served?;
    tracing::info!("Shutdown complete");
    Ok(())
}
