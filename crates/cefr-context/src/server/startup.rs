//! REST server startup and configuration

use anyhow::{Context, Result};
use axum::serve;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::server::routing::{create_router, AppState};

/// Start the REST server and serve until the listener fails or the process
/// receives ctrl-c
pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
  tracing::info!(index = %state.index_name, "Starting context REST server on {addr}");

  let app = create_router(state).layer(
    ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()),
  );

  let listener =
    TcpListener::bind(addr).await.with_context(|| format!("Failed to bind {addr}"))?;
  tracing::info!("Server listening on {addr}");

  serve(listener, app).with_graceful_shutdown(shutdown_signal()).await.context("Server error")?;

  tracing::info!("Server shutdown gracefully");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!("Failed to listen for shutdown signal: {e}");
    std::future::pending::<()>().await;
  }
}
