//! Embedding provider abstraction

use anyhow::Result;
use async_trait::async_trait;

/// Maps text to a fixed-length dense vector
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Embedder: Send + Sync {
  async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
