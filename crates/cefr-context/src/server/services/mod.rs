//! Collaborators behind the query endpoint and ingestion job

pub mod context;
pub mod embedder;
#[cfg(feature = "ml-features")]
pub mod embeddings;
pub mod pinecone;
pub mod vector_database;

pub use context::ContextService;
pub use embedder::Embedder;
pub use vector_database::{IndexStats, VectorIndex};
