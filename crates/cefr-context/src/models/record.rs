//! Records stored in and returned from the vector index

use serde::{Deserialize, Serialize};

use super::CefrLevel;

/// Metadata attached to every chunk; everything but `text` is shared by all
/// chunks of the same source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
  pub cefr_level: CefrLevel,
  pub filename: String,
  pub topic: String,
  pub keywords: Vec<String>,
  pub text: String,
}

/// One embedded chunk, keyed `<filename>_<chunk_index>`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRecord {
  pub id: String,
  pub vector: Vec<f32>,
  pub metadata: RecordMetadata,
}

impl IndexRecord {
  pub fn chunk_id(filename: &str, chunk_index: usize) -> String {
    format!("{filename}_{chunk_index}")
  }
}

/// A ranked similarity match from the vector index
///
/// Metadata is kept loosely typed: the index may hold records written by
/// other tools, and the query path only needs `filename`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryMatch {
  pub id: String,
  #[serde(default)]
  pub score: f32,
  #[serde(default)]
  pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl QueryMatch {
  pub fn filename(&self) -> Option<&str> {
    self.metadata.as_ref()?.get("filename")?.as_str()
  }
}
