#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cefr_context::models::{IndexRecord, QueryMatch};
use cefr_context::server::models::MetadataFilter;
use cefr_context::server::routing::{create_router, AppState};
use cefr_context::server::services::{ContextService, Embedder, IndexStats, VectorIndex};

/// Embedder that counts calls and returns a fixed vector
#[derive(Default)]
pub struct StubEmbedder {
  pub calls: AtomicUsize,
  pub fail: bool,
}

impl StubEmbedder {
  pub fn failing() -> Self {
    Self { fail: true, ..Default::default() }
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl Embedder for StubEmbedder {
  async fn embed(&self, text: &str) -> Result<Vec<f32>> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if self.fail {
      return Err(anyhow!("embedding model unavailable"));
    }
    Ok(vec![text.len() as f32, 0.5, 0.25])
  }
}

/// In-memory index that records upserts and replays canned query matches
#[derive(Default)]
pub struct StubIndex {
  pub records: Mutex<Vec<IndexRecord>>,
  pub matches: Vec<QueryMatch>,
  pub filters: Mutex<Vec<MetadataFilter>>,
  pub query_calls: AtomicUsize,
  pub fail_queries: bool,
}

impl StubIndex {
  /// Index whose queries return one match per filename, in order
  pub fn returning(filenames: &[&str]) -> Self {
    Self { matches: matches_for(filenames), ..Default::default() }
  }

  pub fn failing() -> Self {
    Self { fail_queries: true, ..Default::default() }
  }

  pub fn query_calls(&self) -> usize {
    self.query_calls.load(Ordering::SeqCst)
  }

  pub fn record_ids(&self) -> Vec<String> {
    self.records.lock().unwrap().iter().map(|r| r.id.clone()).collect()
  }
}

#[async_trait]
impl VectorIndex for StubIndex {
  async fn upsert(&self, records: &[IndexRecord]) -> Result<usize> {
    let mut stored = self.records.lock().unwrap();
    for record in records {
      match stored.iter_mut().find(|existing| existing.id == record.id) {
        Some(existing) => *existing = record.clone(),
        None => stored.push(record.clone()),
      }
    }
    Ok(records.len())
  }

  async fn query(
    &self,
    _vector: &[f32],
    filter: &MetadataFilter,
    top_k: usize,
  ) -> Result<Vec<QueryMatch>> {
    self.query_calls.fetch_add(1, Ordering::SeqCst);
    self.filters.lock().unwrap().push(filter.clone());
    if self.fail_queries {
      return Err(anyhow!("index returned 503"));
    }
    Ok(self.matches.iter().take(top_k).cloned().collect())
  }

  async fn describe_stats(&self) -> Result<IndexStats> {
    Ok(IndexStats {
      dimension: Some(3),
      total_vector_count: self.records.lock().unwrap().len() as u64,
    })
  }
}

pub fn matches_for(filenames: &[&str]) -> Vec<QueryMatch> {
  filenames
    .iter()
    .enumerate()
    .map(|(rank, filename)| QueryMatch {
      id: format!("{filename}_{rank}"),
      score: 0.9 - rank as f32 * 0.01,
      metadata: json!({ "filename": filename, "cefr_level": "B1" }).as_object().cloned(),
    })
    .collect()
}

pub fn router(embedder: Arc<StubEmbedder>, index: Arc<StubIndex>) -> axum::Router {
  let service = ContextService::new(embedder, index);
  create_router(AppState::new(service, "test-index"))
}
