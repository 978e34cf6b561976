//! Command-line and environment configuration shared by both binaries
//!
//! Every flag falls back to an environment variable, and binaries load a
//! `.env` file before parsing so local development needs no exported vars.

use clap::Args;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::server::services::pinecone::{
  PineconeConfig, DEFAULT_CONTROL_PLANE_URL, DEFAULT_INDEX_NAME,
};

pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Connection settings for the hosted vector index
#[derive(Debug, Clone, Args)]
pub struct PineconeArgs {
  /// Pinecone API key
  #[arg(long, env = "PINECONE_API_KEY", hide_env_values = true)]
  pub api_key: String,

  /// Pinecone project environment (informational)
  #[arg(long, env = "PINECONE_ENVIRONMENT")]
  pub environment: Option<String>,

  /// Data-plane host of the index; looked up by name when omitted
  #[arg(long, env = "PINECONE_HOST")]
  pub index_host: Option<String>,

  /// Index name
  #[arg(long, env = "PINECONE_INDEX", default_value = DEFAULT_INDEX_NAME)]
  pub index_name: String,

  /// Control-plane base URL used for host lookup
  #[arg(long, env = "PINECONE_CONTROL_PLANE_URL", default_value = DEFAULT_CONTROL_PLANE_URL)]
  pub control_plane_url: String,

  /// Timeout for each index request, in seconds
  #[arg(long, env = "PINECONE_TIMEOUT_SECS", default_value_t = 30)]
  pub request_timeout_secs: u64,
}

impl PineconeArgs {
  pub fn into_config(self) -> PineconeConfig {
    PineconeConfig {
      api_key: self.api_key,
      environment: self.environment,
      host: self.index_host,
      index_name: self.index_name,
      control_plane_url: self.control_plane_url,
      timeout_secs: self.request_timeout_secs,
    }
  }
}

/// Embedding model selection
#[derive(Debug, Clone, Args)]
pub struct EmbeddingArgs {
  /// HuggingFace model id with an ONNX export
  #[arg(long = "model", env = "CEFR_EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL)]
  pub model: String,
}

/// Install the global tracing subscriber. `RUST_LOG` wins when set;
/// otherwise `verbose` picks debug over info for this crate.
pub fn init_logging(verbose: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("cefr_context=debug,tower_http=debug,info")
    } else {
      EnvFilter::new("cefr_context=info,tower_http=info,warn")
    }
  });

  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::Parser;

  #[derive(Parser)]
  struct TestCli {
    #[command(flatten)]
    pinecone: PineconeArgs,

    #[command(flatten)]
    embedding: EmbeddingArgs,
  }

  #[test]
  fn test_defaults_apply() {
    let cli = TestCli::try_parse_from(["test", "--api-key", "secret"]).unwrap();
    let config = cli.pinecone.into_config();
    assert_eq!(config.api_key, "secret");
    assert_eq!(config.index_name, DEFAULT_INDEX_NAME);
    assert_eq!(config.control_plane_url, DEFAULT_CONTROL_PLANE_URL);
    assert_eq!(config.timeout_secs, 30);
    assert_eq!(cli.embedding.model, DEFAULT_EMBEDDING_MODEL);
  }

  #[test]
  fn test_flags_override_defaults() {
    let cli = TestCli::try_parse_from([
      "test",
      "--api-key",
      "secret",
      "--index-host",
      "idx.svc.pinecone.io",
      "--index-name",
      "staging-index",
      "--request-timeout-secs",
      "5",
      "--model",
      "sentence-transformers/paraphrase-MiniLM-L3-v2",
    ])
    .unwrap();
    let config = cli.pinecone.into_config();
    assert_eq!(config.host.as_deref(), Some("idx.svc.pinecone.io"));
    assert_eq!(config.index_name, "staging-index");
    assert_eq!(config.timeout_secs, 5);
    assert_eq!(cli.embedding.model, "sentence-transformers/paraphrase-MiniLM-L3-v2");
  }
}
