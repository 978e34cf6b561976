//! The ingestion loop

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::chunker::split_paragraphs;
use super::error::IngestError;
use super::manifest::{load_manifest, ManifestEntry};
use crate::models::{IndexRecord, RecordMetadata};
use crate::server::services::{Embedder, VectorIndex};

/// A manifest entry whose file could not be read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFile {
  pub filename: String,
  pub reason: String,
}

/// Outcome of one ingestion run
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
  /// Files that produced at least one chunk and were upserted
  pub files_processed: usize,
  pub vectors_upserted: usize,
  pub skipped: Vec<SkippedFile>,
  pub started_at: DateTime<Utc>,
  pub finished_at: DateTime<Utc>,
}

/// Embeds text files and writes them to the vector index, one file at a time
pub struct Ingestor {
  embedder: Arc<dyn Embedder>,
  index: Arc<dyn VectorIndex>,
}

impl Ingestor {
  pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
    Self { embedder, index }
  }

  /// Load the manifest at `manifest_path` and ingest every entry it names
  /// from `data_dir`
  pub async fn run(&self, data_dir: &Path, manifest_path: &Path) -> Result<IngestReport, IngestError> {
    let entries = load_manifest(manifest_path)?;
    tracing::info!(entries = entries.len(), manifest = %manifest_path.display(), "Loaded metadata manifest");
    self.ingest_entries(data_dir, &entries).await
  }

  /// Ingest already-loaded manifest entries
  pub async fn ingest_entries(
    &self,
    data_dir: &Path,
    entries: &[ManifestEntry],
  ) -> Result<IngestReport, IngestError> {
    let started_at = Utc::now();
    let mut files_processed = 0;
    let mut vectors_upserted = 0;
    let mut skipped = Vec::new();

    for entry in entries {
      let path = data_dir.join(&entry.filename);
      tracing::info!(file = %path.display(), "Processing file");

      let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
          tracing::warn!(file = %path.display(), error = %e, "Skipping unreadable file");
          skipped.push(SkippedFile { filename: entry.filename.clone(), reason: e.to_string() });
          continue;
        }
      };

      let records = self.build_records(entry, &path, &text).await?;
      if records.is_empty() {
        tracing::warn!(file = %path.display(), "File has no text chunks");
        continue;
      }

      let filename = record_filename(entry, &path);
      let written = self
        .index
        .upsert(&records)
        .await
        .map_err(|source| IngestError::Index { filename: filename.clone(), source })?;
      if written != records.len() {
        tracing::warn!(file = %filename, sent = records.len(), written, "Index reported a different upsert count");
      }

      files_processed += 1;
      vectors_upserted += records.len();
      tracing::info!(file = %filename, vectors = records.len(), "Upserted vectors");
    }

    let report = IngestReport {
      files_processed,
      vectors_upserted,
      skipped,
      started_at,
      finished_at: Utc::now(),
    };
    tracing::info!(
      files_processed = report.files_processed,
      vectors_upserted = report.vectors_upserted,
      skipped = report.skipped.len(),
      "Finished processing"
    );
    Ok(report)
  }

  async fn build_records(
    &self,
    entry: &ManifestEntry,
    path: &Path,
    text: &str,
  ) -> Result<Vec<IndexRecord>, IngestError> {
    let filename = record_filename(entry, path);
    let mut records = Vec::new();

    for (chunk_index, chunk) in split_paragraphs(text).into_iter().enumerate() {
      let id = IndexRecord::chunk_id(&filename, chunk_index);
      let vector = self
        .embedder
        .embed(&chunk)
        .await
        .map_err(|source| IngestError::Embedding { chunk_id: id.clone(), source })?;

      records.push(IndexRecord {
        id,
        vector,
        metadata: RecordMetadata {
          cefr_level: entry.cefr_level,
          filename: filename.clone(),
          topic: entry.topic.clone(),
          keywords: entry.keywords.clone(),
          text: chunk,
        },
      });
    }

    Ok(records)
  }
}

/// Records are keyed by the file's basename, even when the manifest names
/// it through a subdirectory
fn record_filename(entry: &ManifestEntry, path: &Path) -> String {
  path
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_else(|| entry.filename.clone())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::CefrLevel;
  use crate::server::services::embedder::MockEmbedder;
  use crate::server::services::vector_database::MockVectorIndex;
  use anyhow::anyhow;
  use tempfile::TempDir;

  fn entry(filename: &str) -> ManifestEntry {
    ManifestEntry {
      filename: filename.to_string(),
      cefr_level: CefrLevel::C1,
      topic: "Nature".to_string(),
      keywords: vec!["tree".to_string()],
    }
  }

  fn embedder() -> MockEmbedder {
    let mut embedder = MockEmbedder::new();
    embedder.expect_embed().returning(|text| Ok(vec![text.len() as f32, 1.0]));
    embedder
  }

  #[tokio::test]
  async fn test_subdirectory_files_use_basename() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("c1")).unwrap();
    fs::write(dir.path().join("c1/forest.txt"), "Trees.\n\nRivers.\n\nHills.").unwrap();

    let mut index = MockVectorIndex::new();
    index
      .expect_upsert()
      .withf(|records| {
        records.iter().map(|r| r.id.as_str()).collect::<Vec<_>>()
          == ["forest.txt_0", "forest.txt_1", "forest.txt_2"]
          && records.iter().all(|r| r.metadata.filename == "forest.txt")
      })
      .times(1)
      .returning(|records| Ok(records.len()));

    let ingestor = Ingestor::new(Arc::new(embedder()), Arc::new(index));
    let report = ingestor.ingest_entries(dir.path(), &[entry("c1/forest.txt")]).await.unwrap();
    assert_eq!(report.files_processed, 1);
    assert_eq!(report.vectors_upserted, 3);
  }

  #[tokio::test]
  async fn test_empty_file_is_not_counted() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("blank.txt"), "\n\n  \n").unwrap();

    let mut index = MockVectorIndex::new();
    index.expect_upsert().times(0);

    let ingestor = Ingestor::new(Arc::new(embedder()), Arc::new(index));
    let report = ingestor.ingest_entries(dir.path(), &[entry("blank.txt")]).await.unwrap();
    assert_eq!(report.files_processed, 0);
    assert_eq!(report.vectors_upserted, 0);
    assert!(report.skipped.is_empty());
  }

  #[tokio::test]
  async fn test_embedding_failure_halts_before_upsert() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "One.\n\nTwo.").unwrap();

    let mut embedder = MockEmbedder::new();
    embedder.expect_embed().returning(|_| Err(anyhow!("model crashed")));
    let mut index = MockVectorIndex::new();
    index.expect_upsert().times(0);

    let ingestor = Ingestor::new(Arc::new(embedder), Arc::new(index));
    let error = ingestor.ingest_entries(dir.path(), &[entry("a.txt")]).await.unwrap_err();
    match error {
      IngestError::Embedding { chunk_id, .. } => assert_eq!(chunk_id, "a.txt_0"),
      other => panic!("expected embedding error, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_index_failure_halts_job() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "One.").unwrap();
    fs::write(dir.path().join("b.txt"), "Two.").unwrap();

    let mut index = MockVectorIndex::new();
    index.expect_upsert().times(1).returning(|_| Err(anyhow!("quota exceeded")));

    let ingestor = Ingestor::new(Arc::new(embedder()), Arc::new(index));
    let error = ingestor
      .ingest_entries(dir.path(), &[entry("a.txt"), entry("b.txt")])
      .await
      .unwrap_err();
    assert!(matches!(error, IngestError::Index { ref filename, .. } if filename == "a.txt"));
  }
}
