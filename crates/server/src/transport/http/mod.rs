//! HTTP transport for Overpass server
//!
//! # Routes
//!
//! - `GET  /health`              - liveness and version
//! - `POST /coords`              - positions at an instant or over a range
//! - `POST /radius`              - presence traces for one or many targets
//! - `POST /lst`                 - presence traces for an uploaded target list
//! - `POST /track`               - append fixes to the ephemeris
//! - `POST /channels/{channel}`  - publish a JSON message
//! - `GET  /ws/{channel}`        - WebSocket subscription
//!
//! Errors are JSON `{"code": ..., "message": ...}`.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod ws;

use crate::state::ServerState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::future::Future;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ApiError;

/// Upper bound on request bodies, target list uploads included.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/coords", post(handlers::coords))
        .route("/radius", post(handlers::radius))
        .route("/lst", post(handlers::lst))
        .route("/track", post(handlers::track))
        .route("/channels/:channel", post(handlers::publish))
        .route("/ws/:channel", get(ws::subscribe))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

/// Run the HTTP server until `shutdown` resolves.
pub async fn run_server(
    listener: TcpListener,
    state: ServerState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    info!("Overpass HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
