//! Local sentence embeddings via ONNX Runtime
//!
//! Downloads a sentence-transformers model from the HuggingFace hub on first
//! start, then embeds text by running the transformer, mean-pooling the
//! last hidden state over attended tokens and L2-normalising the result.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use hf_hub::api::tokio::Api;
use ndarray::Array2;
use ort::session::Session;
use ort::value::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tokenizers::{Tokenizer, TruncationParams};

use super::embedder::Embedder;

const TOKENIZER_FILE: &str = "tokenizer.json";
const MODEL_FILE: &str = "onnx/model.onnx";

/// Word-piece limit the MiniLM family was trained with
const MAX_SEQUENCE_LENGTH: usize = 256;

/// Trait abstractions so tensor preparation can be tested without a model
trait TokenEncoding {
  fn get_ids(&self) -> &[u32];
  fn get_attention_mask(&self) -> &[u32];
  fn get_type_ids(&self) -> &[u32];
}

trait SessionInputs {
  fn input_names(&self) -> Vec<String>;
}

impl TokenEncoding for tokenizers::Encoding {
  fn get_ids(&self) -> &[u32] {
    self.get_ids()
  }
  fn get_attention_mask(&self) -> &[u32] {
    self.get_attention_mask()
  }
  fn get_type_ids(&self) -> &[u32] {
    self.get_type_ids()
  }
}

impl SessionInputs for Session {
  fn input_names(&self) -> Vec<String> {
    self.inputs.iter().map(|input| input.name.to_string()).collect()
  }
}

struct ModelFiles {
  tokenizer_file: PathBuf,
  model_path: PathBuf,
}

/// Sentence-transformers model running in-process
pub struct OnnxEmbedder {
  model_name: String,
  tokenizer: Tokenizer,
  // ort sessions need exclusive access per run
  session: Mutex<Session>,
}

impl OnnxEmbedder {
  /// Download (or reuse the cached copy of) `model_name` and load it
  pub async fn load(model_name: &str) -> Result<Self> {
    tracing::info!(model = model_name, "Loading embedding model");

    let files = download_model(model_name).await?;
    let tokenizer = load_tokenizer(files.tokenizer_file)?;
    let session = Session::builder()?.commit_from_file(files.model_path)?;

    tracing::info!(model = model_name, "Embedding model ready");
    Ok(Self { model_name: model_name.to_string(), tokenizer, session: Mutex::new(session) })
  }

  pub fn model_name(&self) -> &str {
    &self.model_name
  }

  fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
    let encoding =
      self.tokenizer.encode(text, true).map_err(|e| anyhow!("Tokenization failed: {e}"))?;

    let mut session =
      self.session.lock().map_err(|_| anyhow!("Embedding session lock poisoned"))?;
    let input = prepare(&encoding, &*session)?;
    let output = session.run(input)?;

    let hidden_state = output
      .get("last_hidden_state")
      .or_else(|| output.get("0"))
      .ok_or_else(|| anyhow!("No output found from model - expected 'last_hidden_state' or '0'"))?;
    let (shape, data) = hidden_state.try_extract_tensor::<f32>()?;

    let pooled = mean_pool(shape.as_ref(), data, encoding.get_attention_mask())?;
    Ok(normalize_embedding(pooled))
  }
}

#[async_trait]
impl Embedder for OnnxEmbedder {
  async fn embed(&self, text: &str) -> Result<Vec<f32>> {
    self.embed_text(text)
  }
}

async fn download_model(model_name: &str) -> Result<ModelFiles> {
  let api = Api::new().map_err(|e| anyhow!("HF API initialization failed: {e}"))?;
  let repo = api.model(model_name.to_string());

  let tokenizer_file =
    repo.get(TOKENIZER_FILE).await.map_err(|e| anyhow!("Failed to download tokenizer: {e}"))?;
  let model_path =
    repo.get(MODEL_FILE).await.map_err(|e| anyhow!("Failed to download ONNX model: {e}"))?;

  Ok(ModelFiles { tokenizer_file, model_path })
}

fn load_tokenizer(path: PathBuf) -> Result<Tokenizer> {
  let mut tokenizer =
    Tokenizer::from_file(path).map_err(|e| anyhow!("Failed to load tokenizer: {e}"))?;
  tokenizer
    .with_truncation(Some(TruncationParams {
      max_length: MAX_SEQUENCE_LENGTH,
      ..Default::default()
    }))
    .map_err(|e| anyhow!("Failed to configure truncation: {e}"))?;
  Ok(tokenizer)
}

/// Build the named input tensors, including only what the model declares
fn prepare(tokens: &dyn TokenEncoding, session: &dyn SessionInputs) -> Result<HashMap<String, Value>> {
  let mut input = HashMap::new();
  input.insert("input_ids".to_string(), to_tensor(tokens.get_ids())?);
  input.insert("attention_mask".to_string(), to_tensor(tokens.get_attention_mask())?);

  if session.input_names().iter().any(|name| name == "token_type_ids") {
    input.insert("token_type_ids".to_string(), to_tensor(tokens.get_type_ids())?);
  }

  Ok(input)
}

fn to_tensor(values: &[u32]) -> Result<Value> {
  let array: Array2<i64> =
    Array2::from_shape_vec((1, values.len()), values.iter().map(|&v| i64::from(v)).collect())?;
  let tensor: Value = Value::from_array(array)?.into();
  Ok(tensor)
}

/// Average token vectors of a `[1, seq_len, hidden]` tensor, counting only
/// positions whose attention mask is set
fn mean_pool(shape: &[i64], data: &[f32], attention_mask: &[u32]) -> Result<Vec<f32>> {
  let [_, seq_length, hidden_size] = shape else {
    return Err(anyhow!("Unexpected hidden state shape {shape:?}"));
  };
  let seq_length = usize::try_from(*seq_length)?;
  let hidden_size = usize::try_from(*hidden_size)?;

  if data.len() < seq_length * hidden_size {
    return Err(anyhow!("Hidden state holds {} values, expected {}", data.len(), seq_length * hidden_size));
  }

  let mut embedding = vec![0.0f32; hidden_size];
  let mut attended = 0usize;
  for token_idx in 0..seq_length {
    if attention_mask.get(token_idx).copied().unwrap_or(1) == 0 {
      continue;
    }
    attended += 1;
    let start = token_idx * hidden_size;
    for (sum, &value) in embedding.iter_mut().zip(&data[start..start + hidden_size]) {
      *sum += value;
    }
  }

  if attended > 0 {
    for value in embedding.iter_mut() {
      *value /= attended as f32;
    }
  }

  Ok(embedding)
}

/// Scale to unit length; zero vectors are returned unchanged
fn normalize_embedding(mut embedding: Vec<f32>) -> Vec<f32> {
  let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

  if magnitude < f32::EPSILON {
    tracing::warn!("Zero-magnitude embedding detected - returning unchanged");
    return embedding;
  }

  for value in embedding.iter_mut() {
    *value /= magnitude;
  }
  embedding
}
