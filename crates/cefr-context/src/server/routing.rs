//! Axum router configuration for all endpoints

use axum::{middleware, routing::get, Router};
use std::sync::Arc;

use crate::server::handlers::{context, status};
use crate::server::middleware::request_context_middleware;
use crate::server::services::ContextService;

/// State shared by every handler, built once at startup
#[derive(Clone)]
pub struct AppState {
  pub service: Arc<ContextService>,
  pub index_name: String,
}

impl AppState {
  pub fn new(service: ContextService, index_name: impl Into<String>) -> Self {
    Self { service: Arc::new(service), index_name: index_name.into() }
  }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
  Router::new()
    // Status and version endpoints
    .route("/status", get(status::status))
    .route("/version", get(status::version))
    .route("/api", get(status::api_info))
    // Retrieval
    .route("/get_context", get(context::get_context))
    .layer(middleware::from_fn(request_context_middleware))
    .with_state(state)
}
