//! Duet server - HTTP and WebSocket adapters over `duet_core`.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod hub;
pub mod logging;
pub mod protocol;
pub mod routes;
pub mod sweeper;
pub mod ws;

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use duet_core::RoomService;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use hub::Hub;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RoomService>,
    pub hub: Arc<Hub>,
    pub turn_advance_delay: Duration,
}

impl AppState {
    pub fn new(service: Arc<RoomService>, turn_advance_delay: Duration) -> Self {
        Self {
            service,
            hub: Arc::new(Hub::new()),
            turn_advance_delay,
        }
    }
}

/// Full application router with request logging, tracing and CORS applied.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    routes::router(state)
        .layer(middleware::from_fn(logging::log_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
