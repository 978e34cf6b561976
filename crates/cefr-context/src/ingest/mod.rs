//! Offline ingestion of reading texts into the vector index
//!
//! Reads a manifest describing each text file, splits every file into
//! paragraph chunks, embeds the chunks and upserts them with the file's
//! shared metadata.

pub mod chunker;
pub mod error;
pub mod job;
pub mod manifest;

pub use chunker::split_paragraphs;
pub use error::IngestError;
pub use job::{IngestReport, Ingestor, SkippedFile};
pub use manifest::{load_manifest, ManifestEntry};
