//! Pinecone implementation of the VectorIndex trait
//!
//! Talks to the index's data-plane REST API. The data-plane host is either
//! configured directly or looked up once through the control plane.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::models::{IndexRecord, QueryMatch};
use crate::server::models::MetadataFilter;
use crate::server::services::vector_database::{IndexStats, VectorIndex};

pub const DEFAULT_INDEX_NAME: &str = "cefr-text-index";
pub const DEFAULT_CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
const API_VERSION: &str = "2024-07";

/// Connection settings for a Pinecone index
#[derive(Debug, Clone)]
pub struct PineconeConfig {
  pub api_key: String,
  /// Legacy project environment; only reported, the data plane ignores it
  pub environment: Option<String>,
  /// Data-plane host; skips the control-plane lookup when set
  pub host: Option<String>,
  pub index_name: String,
  pub control_plane_url: String,
  pub timeout_secs: u64,
}

impl PineconeConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      api_key: api_key.into(),
      environment: None,
      host: None,
      index_name: DEFAULT_INDEX_NAME.to_string(),
      control_plane_url: DEFAULT_CONTROL_PLANE_URL.to_string(),
      timeout_secs: 30,
    }
  }
}

/// Handle to one Pinecone index
#[derive(Clone)]
pub struct PineconeIndex {
  client: Client,
  api_key: String,
  index_name: String,
  host: String,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
  vectors: Vec<UpsertVector<'a>>,
}

#[derive(Serialize)]
struct UpsertVector<'a> {
  id: &'a str,
  values: &'a [f32],
  metadata: &'a crate::models::RecordMetadata,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
  #[serde(default)]
  upserted_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
  vector: &'a [f32],
  top_k: usize,
  #[serde(skip_serializing_if = "has_no_conditions")]
  filter: &'a MetadataFilter,
  include_metadata: bool,
  include_values: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
  #[serde(default)]
  matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct DescribeIndexResponse {
  host: String,
}

impl PineconeIndex {
  /// Build a client and resolve the data-plane host
  pub async fn connect(config: PineconeConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .context("Failed to create HTTP client")?;

    if let Some(environment) = &config.environment {
      tracing::debug!(environment = %environment, "Pinecone environment configured");
    }

    let host = match config.host.as_deref().map(str::trim).filter(|h| !h.is_empty()) {
      Some(host) => normalize_host(host),
      None => resolve_host(&client, &config).await?,
    };

    tracing::info!(index = %config.index_name, host = %host, "Connected to Pinecone index");
    Ok(Self { client, api_key: config.api_key, index_name: config.index_name, host })
  }

  pub fn index_name(&self) -> &str {
    &self.index_name
  }

  pub fn host(&self) -> &str {
    &self.host
  }

  fn post(&self, path: &str) -> RequestBuilder {
    authorized(self.client.post(format!("{}{path}", self.host)), &self.api_key)
  }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
  async fn upsert(&self, records: &[IndexRecord]) -> Result<usize> {
    if records.is_empty() {
      return Ok(0);
    }

    let request = UpsertRequest {
      vectors: records
        .iter()
        .map(|record| UpsertVector {
          id: &record.id,
          values: &record.vector,
          metadata: &record.metadata,
        })
        .collect(),
    };

    let response = self.post("/vectors/upsert").json(&request).send().await?;
    let body: UpsertResponse = parse(response, "upsert").await?;
    Ok(body.upserted_count)
  }

  async fn query(
    &self,
    vector: &[f32],
    filter: &MetadataFilter,
    top_k: usize,
  ) -> Result<Vec<QueryMatch>> {
    let request = QueryRequest {
      vector,
      top_k,
      filter,
      include_metadata: true,
      include_values: false,
    };

    let response = self.post("/query").json(&request).send().await?;
    let body: QueryResponse = parse(response, "query").await?;
    Ok(body.matches)
  }

  async fn describe_stats(&self) -> Result<IndexStats> {
    let response = self.post("/describe_index_stats").json(&Map::<String, Value>::new()).send().await?;
    parse(response, "describe_index_stats").await
  }
}

fn has_no_conditions(filter: &&MetadataFilter) -> bool {
  filter.is_empty()
}

fn authorized(builder: RequestBuilder, api_key: &str) -> RequestBuilder {
  builder.header("Api-Key", api_key).header("X-Pinecone-API-Version", API_VERSION)
}

fn normalize_host(host: &str) -> String {
  let host = host.trim_end_matches('/');
  if host.starts_with("http://") || host.starts_with("https://") {
    host.to_string()
  } else {
    format!("https://{host}")
  }
}

async fn resolve_host(client: &Client, config: &PineconeConfig) -> Result<String> {
  let url = format!(
    "{}/indexes/{}",
    config.control_plane_url.trim_end_matches('/'),
    config.index_name
  );
  let response = authorized(client.get(url), &config.api_key).send().await?;
  let body: DescribeIndexResponse = parse(response, "describe_index").await?;
  Ok(normalize_host(&body.host))
}

async fn parse<T: serde::de::DeserializeOwned>(response: Response, operation: &str) -> Result<T> {
  let status = response.status();
  if !status.is_success() {
    let text = response.text().await.unwrap_or_default();
    return Err(anyhow!("Pinecone {operation} failed ({status}): {text}"));
  }
  response.json::<T>().await.with_context(|| format!("Invalid Pinecone {operation} response"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_normalize_host() {
    assert_eq!(normalize_host("idx-abc.svc.pinecone.io"), "https://idx-abc.svc.pinecone.io");
    assert_eq!(normalize_host("https://idx-abc.svc.pinecone.io/"), "https://idx-abc.svc.pinecone.io");
    assert_eq!(normalize_host("http://localhost:5081"), "http://localhost:5081");
  }

  #[test]
  fn test_query_request_shape() {
    let filter = MetadataFilter::new().eq("cefr_level", "B1");
    let request = QueryRequest {
      vector: &[0.5, 0.25],
      top_k: 20,
      filter: &filter,
      include_metadata: true,
      include_values: false,
    };
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["topK"], 20);
    assert_eq!(value["includeMetadata"], true);
    assert_eq!(value["filter"]["cefr_level"]["$eq"], "B1");
  }

  #[test]
  fn test_empty_filter_is_omitted() {
    let filter = MetadataFilter::new();
    let request = QueryRequest {
      vector: &[1.0],
      top_k: 1,
      filter: &filter,
      include_metadata: true,
      include_values: false,
    };
    let value = serde_json::to_value(&request).unwrap();
    assert!(value.get("filter").is_none());
  }

  #[test]
  fn test_config_defaults() {
    let config = PineconeConfig::new("key");
    assert_eq!(config.index_name, "cefr-text-index");
    assert_eq!(config.control_plane_url, DEFAULT_CONTROL_PLANE_URL);
    assert!(config.host.is_none());
  }
}
