//! Query parameters for `/get_context` and their validation

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{CefrLevel, Workflow};
use crate::server::error::ContextError;
use crate::server::models::message::parse_user_message;

/// Raw query string as received; every field is optional until validated
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ContextQuery {
  /// "bespoke" or "differentiated"
  pub workflow: Option<String>,

  /// One of A1, A2, B1, B2, C1
  pub cefr_level: Option<String>,

  /// Topic used for both filtering and semantic similarity
  pub topic: Option<String>,

  /// Comma-separated keywords
  pub keywords: Option<String>,

  /// Requested text length (passed through)
  pub length: Option<String>,

  /// Source text for differentiated workflows (not used for retrieval)
  pub main_text: Option<String>,

  /// Free-text alternative to the discrete parameters
  pub user_message: Option<String>,
}

/// A fully validated retrieval request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryParams {
  pub workflow: Workflow,
  pub cefr_level: CefrLevel,
  pub topic: String,
  pub keywords: Vec<String>,
  pub length: Option<String>,
  pub main_text: Option<String>,
}

impl ContextQuery {
  /// Pick the request form: a present `user_message` wins over the discrete
  /// parameters, which are then ignored.
  pub fn resolve(&self) -> Result<QueryParams, ContextError> {
    match self.user_message.as_deref() {
      Some(message) if message.trim().is_empty() => Err(ContextError::MissingUserMessage),
      Some(message) => Ok(parse_user_message(message)?),
      None => self.validate(),
    }
  }

  /// Validate the discrete-parameter form. Nothing downstream runs unless
  /// this succeeds.
  pub fn validate(&self) -> Result<QueryParams, ContextError> {
    let workflow = self
      .workflow
      .as_deref()
      .and_then(|value| value.parse::<Workflow>().ok())
      .ok_or_else(|| ContextError::InvalidParameter("Invalid 'workflow' parameter.".to_string()))?;

    let cefr_level = self
      .cefr_level
      .as_deref()
      .and_then(|value| value.parse::<CefrLevel>().ok())
      .ok_or_else(|| {
        ContextError::InvalidParameter("Invalid 'cefr_level' parameter.".to_string())
      })?;

    let topic = self
      .topic
      .as_deref()
      .map(str::trim)
      .filter(|topic| !topic.is_empty())
      .ok_or_else(|| ContextError::InvalidParameter("Missing 'topic' parameter.".to_string()))?;

    Ok(QueryParams {
      workflow,
      cefr_level,
      topic: topic.to_string(),
      keywords: self.keywords.as_deref().map(split_keywords).unwrap_or_default(),
      length: self.length.clone(),
      main_text: self.main_text.clone(),
    })
  }
}

/// Split a comma-separated keyword list, dropping blanks and repeats while
/// keeping first-seen order.
pub fn split_keywords(raw: &str) -> Vec<String> {
  let mut keywords: Vec<String> = Vec::new();
  for keyword in raw.split(',').map(str::trim).filter(|k| !k.is_empty()) {
    if !keywords.iter().any(|seen| seen == keyword) {
      keywords.push(keyword.to_string());
    }
  }
  keywords
}
