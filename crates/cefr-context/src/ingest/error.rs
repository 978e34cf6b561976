//! Ingestion failures that stop the job

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
  #[error("Metadata file not found: {}", .0.display())]
  ManifestNotFound(PathBuf),

  #[error("Invalid metadata file {}: {source}", .path.display())]
  ManifestMalformed {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Failed to embed chunk {chunk_id}: {source}")]
  Embedding {
    chunk_id: String,
    #[source]
    source: anyhow::Error,
  },

  #[error("Failed to upsert {filename}: {source}")]
  Index {
    filename: String,
    #[source]
    source: anyhow::Error,
  },
}
