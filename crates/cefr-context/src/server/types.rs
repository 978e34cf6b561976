//! REST API types with schemars annotations for schema generation

use schemars::schema::RootSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Context Endpoint
// ================

/// Body of every `/get_context` response, tagged by `status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ContextResponse {
  /// Up to five unique filenames in relevance order
  Success { filenames: Vec<String> },

  /// Human readable reason the request failed
  Error { message: String },
}

impl ContextResponse {
  pub fn success(filenames: Vec<String>) -> Self {
    Self::Success { filenames }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self::Error { message: message.into() }
  }
}

// Status/Version Endpoints
// =======================

/// Response for /status endpoint
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StatusResponse {
  /// Always "healthy" while the process is serving
  pub status: String,

  /// Name of the vector index queries run against
  pub index: String,

  /// Whether the metadata filter requires an exact topic match
  pub topic_filter: bool,

  /// Crate version
  pub version: String,
}

/// Response for /version endpoint
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionResponse {
  /// Current API version
  pub version: String,
}

/// Response for /api endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiInfoResponse {
  /// Current API version
  pub version: String,

  /// Schemas keyed by route
  pub endpoints: Vec<EndpointSchema>,
}

/// Request and response schema for one route
#[derive(Debug, Serialize, Deserialize)]
pub struct EndpointSchema {
  pub method: String,
  pub path: String,

  /// Query string schema, when the route takes parameters
  #[serde(skip_serializing_if = "Option::is_none")]
  pub query: Option<RootSchema>,

  pub response: RootSchema,
}
