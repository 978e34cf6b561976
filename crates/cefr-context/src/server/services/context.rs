//! Retrieval of reading-text filenames for a validated request

use anyhow::Context;
use std::collections::HashSet;
use std::sync::Arc;

use crate::models::QueryMatch;
use crate::server::error::ContextError;
use crate::server::models::{MetadataFilter, QueryParams};
use crate::server::services::embedder::Embedder;
use crate::server::services::vector_database::VectorIndex;

/// Matches requested from the index per query; fetching more than we return
/// leaves room for several chunks of the same file
pub const QUERY_TOP_K: usize = 20;

/// Unique filenames returned per request
pub const MAX_FILENAMES: usize = 5;

/// Embeds the request topic and runs a filtered similarity search
#[derive(Clone)]
pub struct ContextService {
  embedder: Arc<dyn Embedder>,
  index: Arc<dyn VectorIndex>,
  match_topic: bool,
}

impl ContextService {
  pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
    Self { embedder, index, match_topic: true }
  }

  /// Whether the metadata filter requires an exact `topic` match in
  /// addition to topic similarity
  pub fn with_topic_filter(mut self, match_topic: bool) -> Self {
    self.match_topic = match_topic;
    self
  }

  pub fn matches_topic_exactly(&self) -> bool {
    self.match_topic
  }

  pub async fn find_filenames(&self, params: &QueryParams) -> Result<Vec<String>, ContextError> {
    let filter = MetadataFilter::for_query(params, self.match_topic);
    tracing::debug!(filter = ?filter, "Built metadata filter");

    let vector = self
      .embedder
      .embed(&params.topic)
      .await
      .context("Failed to embed topic")
      .map_err(ContextError::Upstream)?;

    let matches = self
      .index
      .query(&vector, &filter, QUERY_TOP_K)
      .await
      .context("Vector index query failed")
      .map_err(ContextError::Upstream)?;

    tracing::debug!(matches = matches.len(), "Vector index returned matches");
    Ok(unique_filenames(&matches, MAX_FILENAMES))
  }
}

/// Filenames in rank order, first occurrence only, at most `limit`
pub fn unique_filenames(matches: &[QueryMatch], limit: usize) -> Vec<String> {
  let mut seen = HashSet::new();
  let mut filenames = Vec::new();

  for filename in matches.iter().filter_map(QueryMatch::filename) {
    if filenames.len() >= limit {
      break;
    }
    if seen.insert(filename) {
      filenames.push(filename.to_string());
    }
  }

  filenames
}
