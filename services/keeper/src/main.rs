//! Tournament lifecycle keeper
//!
//! Background daemon that reconciles on-chain tournament state: cancels
//! underfilled tournaments at their start time, simulates gameplay scores
//! for running ones, and finalizes ended ones so the contract pays out.
//! Also serves the admin HTTP API for manual interventions.

mod api;
mod chain;
mod config;
mod error;
mod executors;
mod reconciler;
mod scheduler;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::chain::{EthersChain, TournamentChain};
use crate::config::KeeperConfig;
use crate::reconciler::Reconciler;
use crate::scheduler::Scheduler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = KeeperConfig::parse();
    config.validate().context("invalid configuration")?;

    let chain: Arc<dyn TournamentChain> =
        Arc::new(EthersChain::connect(&config).context("chain client setup failed")?);
    info!(
        contract = %config.contract_address,
        chain_id = config.chain_id,
        "chain client initialized"
    );

    let reconciler = Arc::new(Reconciler::new(chain.clone()));
    let scheduler = Scheduler::new(
        reconciler.clone(),
        Duration::from_millis(config.interval_ms),
    );
    scheduler.start();

    let app = api::router(AppState {
        chain,
        reconciler,
        admin_key: config.admin_key.clone(),
    });
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "admin API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("admin API server failed")?;

    // Server is down; stop scheduling and let any in-flight pass finish
    scheduler.stop().await;
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGINT received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
    }
}
