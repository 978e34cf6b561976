//! Status and version endpoint handlers

use axum::{extract::State, response::Json};
use schemars::schema_for;

use crate::server::models::ContextQuery;
use crate::server::routing::AppState;
use crate::server::types::{
  ApiInfoResponse, ContextResponse, EndpointSchema, StatusResponse, VersionResponse,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GET /status - Health check endpoint
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
  Json(StatusResponse {
    status: "healthy".to_string(),
    index: state.index_name.clone(),
    topic_filter: state.service.matches_topic_exactly(),
    version: VERSION.to_string(),
  })
}

/// GET /version - Returns current API version
pub async fn version() -> Json<VersionResponse> {
  Json(VersionResponse { version: VERSION.to_string() })
}

/// GET /api - Returns the schemas of every endpoint
pub async fn api_info() -> Json<ApiInfoResponse> {
  let endpoints = vec![
    EndpointSchema {
      method: "GET".to_string(),
      path: "/get_context".to_string(),
      query: Some(schema_for!(ContextQuery)),
      response: schema_for!(ContextResponse),
    },
    EndpointSchema {
      method: "GET".to_string(),
      path: "/status".to_string(),
      query: None,
      response: schema_for!(StatusResponse),
    },
    EndpointSchema {
      method: "GET".to_string(),
      path: "/version".to_string(),
      query: None,
      response: schema_for!(VersionResponse),
    },
  ];

  Json(ApiInfoResponse { version: VERSION.to_string(), endpoints })
}
