//! Prior authorization record service.
//!
//! Serves Claim, ClaimResponse, and Bundle records from an in-memory store,
//! optionally seeded from a fixture directory at startup.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use priorauth_persistence::backends::memory::MemoryBackend;
use priorauth_persistence::core::RecordStorage;
use priorauth_rest::{AppState, ServerConfig, create_app_with_state, init_logging, seed_store};
use tracing::{info, warn};

/// Starts the Axum HTTP server and serves until Ctrl-C.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        base_url = %config.base_url(),
        "Starting prior authorization record service"
    );

    let storage = Arc::new(MemoryBackend::new());

    if let Some(dir) = &config.seed_dir {
        let loaded = seed_store(storage.as_ref(), dir)
            .await
            .with_context(|| format!("failed to seed store from {}", dir.display()))?;
        info!(records = loaded, dir = %dir.display(), "Seeded record store");
    }

    let app = create_app_with_state(AppState::new(Arc::clone(&storage), config.clone()));
    serve(app, &config).await?;

    storage.close().await?;
    info!("Record store closed");
    Ok(())
}
