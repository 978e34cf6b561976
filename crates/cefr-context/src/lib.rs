//! CEFR Context - reading text retrieval for language-learning workflows
//!
//! Serves filenames of CEFR-leveled reading texts relevant to a requested
//! topic, level and workflow, backed by a hosted vector index that the
//! ingestion job populates from a directory of text files.

pub mod config;
pub mod ingest;
pub mod models;
pub mod server;
