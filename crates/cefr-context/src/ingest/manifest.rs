//! Metadata manifest describing the text files to ingest

use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::error::IngestError;
use crate::models::CefrLevel;

/// Shared metadata for every chunk of one text file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ManifestEntry {
  /// Path of the text file, relative to the data directory
  pub filename: String,
  pub cefr_level: CefrLevel,
  pub topic: String,
  #[serde(default)]
  pub keywords: Vec<String>,
}

/// Read the JSON array of entries at `path`. Any failure here is fatal for
/// the job, so nothing else runs when the manifest is unusable.
pub fn load_manifest(path: &Path) -> Result<Vec<ManifestEntry>, IngestError> {
  let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
    ErrorKind::NotFound => IngestError::ManifestNotFound(path.to_path_buf()),
    _ => IngestError::ManifestMalformed {
      path: path.to_path_buf(),
      source: serde_json::Error::io(e),
    },
  })?;

  serde_json::from_str(&contents)
    .map_err(|source| IngestError::ManifestMalformed { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_load_manifest() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("C1_metadata.json");
    fs::write(
      &path,
      r#"[
        {"filename": "forest.txt", "cefr_level": "C1", "topic": "Nature", "keywords": ["tree", "river"]},
        {"filename": "city.txt", "cefr_level": "B1", "topic": "Urban life"}
      ]"#,
    )
    .unwrap();

    let entries = load_manifest(&path).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].cefr_level, CefrLevel::C1);
    assert_eq!(entries[0].keywords, vec!["tree", "river"]);
    assert!(entries[1].keywords.is_empty());
  }

  #[test]
  fn test_missing_manifest() {
    let dir = TempDir::new().unwrap();
    let error = load_manifest(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(error, IngestError::ManifestNotFound(_)));
  }

  #[test]
  fn test_malformed_manifest() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");

    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(load_manifest(&path), Err(IngestError::ManifestMalformed { .. })));

    fs::write(&path, r#"[{"filename": "a.txt", "cefr_level": "C2", "topic": "x"}]"#).unwrap();
    assert!(matches!(load_manifest(&path), Err(IngestError::ManifestMalformed { .. })));
  }
}
