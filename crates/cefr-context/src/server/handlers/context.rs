//! Context retrieval endpoint handler

use axum::{
  extract::{rejection::QueryRejection, Extension, Query, State},
  http::StatusCode,
  response::Json,
};

use crate::server::error::ContextError;
use crate::server::middleware::RequestContext;
use crate::server::models::ContextQuery;
use crate::server::routing::AppState;
use crate::server::types::ContextResponse;

type HandlerResult = Result<Json<ContextResponse>, (StatusCode, Json<ContextResponse>)>;

/// GET /get_context - Filenames of reading texts matching the request
pub async fn get_context(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  query: Result<Query<ContextQuery>, QueryRejection>,
) -> HandlerResult {
  let Query(query) = query.map_err(|rejection| {
    tracing::warn!(request_id = %context.request_id, error = %rejection, "Malformed query string");
    (StatusCode::BAD_REQUEST, Json(ContextResponse::error(rejection.body_text())))
  })?;

  let params = query.resolve().map_err(|error| reject(&context, error))?;
  tracing::info!(
    workflow = %params.workflow,
    cefr_level = %params.cefr_level,
    topic = %params.topic,
    keywords = params.keywords.len(),
    "Resolved context query"
  );

  let filenames =
    state.service.find_filenames(&params).await.map_err(|error| reject(&context, error))?;

  tracing::info!(count = filenames.len(), "Returning filenames");
  Ok(Json(ContextResponse::success(filenames)))
}

fn reject(context: &RequestContext, error: ContextError) -> (StatusCode, Json<ContextResponse>) {
  let status = error.status_code();
  if error.is_client_error() {
    tracing::warn!(request_id = %context.request_id, error = %error, "Rejected context query");
  } else {
    tracing::error!(request_id = %context.request_id, error = ?error, "Context query failed");
  }
  (status, Json(ContextResponse::error(error.to_string())))
}
