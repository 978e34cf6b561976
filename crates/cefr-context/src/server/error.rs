//! Error taxonomy for the query endpoint

use axum::http::StatusCode;
use thiserror::Error;

use crate::server::models::ParseFailure;

#[derive(Debug, Error)]
pub enum ContextError {
  /// A discrete query parameter was missing or outside its allowed values
  #[error("{0}")]
  InvalidParameter(String),

  #[error("Missing 'user_message' parameter.")]
  MissingUserMessage,

  #[error(transparent)]
  UnparsableMessage(#[from] ParseFailure),

  /// The embedding provider or vector index failed; renders the full
  /// context chain so the upstream cause reaches the caller
  #[error("{0:#}")]
  Upstream(anyhow::Error),
}

impl ContextError {
  pub fn status_code(&self) -> StatusCode {
    match self {
      ContextError::InvalidParameter(_)
      | ContextError::MissingUserMessage
      | ContextError::UnparsableMessage(_) => StatusCode::BAD_REQUEST,
      ContextError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  pub fn is_client_error(&self) -> bool {
    self.status_code().is_client_error()
  }
}
