//! Vector index abstraction shared by the query service and ingestion job
//!
//! Handlers and the ingestion loop only see this trait, so the hosted index
//! can be swapped for a stub in tests without touching either caller.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{IndexRecord, QueryMatch};
use crate::server::models::MetadataFilter;

/// Summary statistics reported by the index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
  #[serde(default)]
  pub dimension: Option<usize>,
  #[serde(default)]
  pub total_vector_count: u64,
}

/// Record store with filtered top-k similarity search
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorIndex: Send + Sync {
  /// Insert or overwrite records keyed by id; returns how many were written
  async fn upsert(&self, records: &[IndexRecord]) -> Result<usize>;

  /// Return up to `top_k` matches ranked by similarity, metadata included
  async fn query(
    &self,
    vector: &[f32],
    filter: &MetadataFilter,
    top_k: usize,
  ) -> Result<Vec<QueryMatch>>;

  async fn describe_stats(&self) -> Result<IndexStats>;
}
