//! CEFR text ingestion job
//!
//! Chunks and embeds the text files listed in a metadata manifest and
//! upserts them into the Pinecone index the context server queries.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use cefr_context::config::{init_logging, EmbeddingArgs, PineconeArgs};
use cefr_context::ingest::{load_manifest, Ingestor};
use cefr_context::server::services::embeddings::OnnxEmbedder;
use cefr_context::server::services::pinecone::PineconeIndex;
use cefr_context::server::services::VectorIndex;

#[derive(Parser)]
#[command(name = "cefr_ingest")]
#[command(about = "Load CEFR reading texts into the vector index")]
#[command(version)]
struct Args {
  /// Directory holding the manifest and the text files it names
  #[arg(long, env = "CEFR_DATA_DIR")]
  data_dir: PathBuf,

  /// Manifest path, relative to the data directory unless absolute
  #[arg(long, env = "CEFR_MANIFEST", default_value = "C1_metadata.json")]
  manifest: PathBuf,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,

  #[command(flatten)]
  pinecone: PineconeArgs,

  #[command(flatten)]
  embedding: EmbeddingArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
  dotenvy::dotenv().ok();
  let args = Args::parse();
  init_logging(args.verbose);

  let manifest_path = args.data_dir.join(&args.manifest);

  // Fail on a bad manifest before downloading the model or touching the index
  let entries = load_manifest(&manifest_path)?;
  tracing::info!(entries = entries.len(), manifest = %manifest_path.display(), "Loaded metadata manifest");

  let embedder = OnnxEmbedder::load(&args.embedding.model)
    .await
    .context("Failed to load embedding model")?;
  let index = Arc::new(
    PineconeIndex::connect(args.pinecone.into_config())
      .await
      .context("Failed to connect to Pinecone")?,
  );

  let ingestor = Ingestor::new(Arc::new(embedder), index.clone());
  let report = ingestor.ingest_entries(&args.data_dir, &entries).await?;

  println!(
    "Finished processing.\nFiles processed: {}.\nVectors upserted: {}",
    report.files_processed, report.vectors_upserted
  );
  for skipped in &report.skipped {
    println!("Skipped {}: {}", skipped.filename, skipped.reason);
  }

  let stats = index.describe_stats().await.context("Failed to read index stats")?;
  tracing::info!(
    dimension = ?stats.dimension,
    total_vector_count = stats.total_vector_count,
    "Updated index stats"
  );

  Ok(())
}
