//! CEFR Context REST Server
//!
//! Serves `/get_context`, returning filenames of reading texts that match a
//! requested workflow, CEFR level and topic.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use cefr_context::config::{init_logging, EmbeddingArgs, PineconeArgs};
use cefr_context::server::routing::AppState;
use cefr_context::server::services::embeddings::OnnxEmbedder;
use cefr_context::server::services::pinecone::PineconeIndex;
use cefr_context::server::services::ContextService;
use cefr_context::server::startup::start_server;

#[derive(Parser)]
#[command(name = "cefr_context_server")]
#[command(about = "CEFR reading text context server")]
#[command(version)]
struct Args {
  /// Interface to bind
  #[arg(long, env = "HOST", default_value = "0.0.0.0")]
  bind_host: IpAddr,

  /// Port to listen on
  #[arg(long, env = "PORT", default_value_t = 5000)]
  port: u16,

  /// Match on topic similarity only, without an exact topic filter
  #[arg(long)]
  no_topic_filter: bool,

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

  tracing::info!("Starting CEFR context server v{}", env!("CARGO_PKG_VERSION"));

  let embedder = OnnxEmbedder::load(&args.embedding.model)
    .await
    .context("Failed to load embedding model")?;
  let index = PineconeIndex::connect(args.pinecone.into_config())
    .await
    .context("Failed to connect to Pinecone")?;
  let index_name = index.index_name().to_string();
  tracing::info!(model = embedder.model_name(), index = %index_name, "Retrieval backends ready");

  let service = ContextService::new(Arc::new(embedder), Arc::new(index))
    .with_topic_filter(!args.no_topic_filter);
  let state = AppState::new(service, index_name);

  start_server(SocketAddr::new(args.bind_host, args.port), state).await
}
