use std::sync::Arc;

use anyhow::{Context, Result};
use duet_core::{InMemoryRoomStore, RoomService, RoomStore, WordPool};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::{build_router, sweeper, AppState};

const LOG_TARGET: &str = "duet_server::bootstrap";

pub fn build_service(config: &ServerConfig) -> RoomService {
    let store: Arc<dyn RoomStore> = Arc::new(InMemoryRoomStore::new());
    match config.rng_seed {
        Some(seed) => RoomService::with_seed(store, WordPool::standard(), seed),
        None => RoomService::new(store, WordPool::standard()),
    }
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    config.validate()?;
    let cors = config.cors_layer()?;

    let service = Arc::new(build_service(&config));
    let state = AppState::new(service, config.turn_advance_delay);
    let sweeper = sweeper::spawn(
        Arc::clone(&state.service),
        Arc::clone(&state.hub),
        config.room_ttl,
        config.sweep_interval,
    );

    let router = build_router(state, cors);
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        target: LOG_TARGET,
        %local_addr,
        room_ttl_secs = config.room_ttl.as_secs(),
        "duet server listening"
    );

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with error");
    sweeper.abort();
    served
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(target: LOG_TARGET, error = %err, "failed to install ctrl-c handler");
    }
    tracing::info!(target: LOG_TARGET, "shutdown signal received");
}
