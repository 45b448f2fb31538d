//! Production embedder: all-MiniLM-L6-v2 over ONNX Runtime
//!
//! Downloads the model and tokenizer from HuggingFace on first use,
//! then runs locally. Embeddings are mean-pooled over the attention
//! mask and normalized to unit length, matching the upstream
//! sentence-transformers behavior.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use hf_hub::api::tokio::Api;
use ndarray::Array2;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tokenizers::Tokenizer;

use ort::{
  execution_providers::CPUExecutionProvider, session::Session, value::Value,
};

use super::{normalize, TextEmbedder};

/// Model identity; must match between the build step and the query step
pub const MODEL_NAME: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Output dimension of the model
pub const EMBEDDING_DIMENSION: usize = 384;

const TOKENIZER_FILE: &str = "tokenizer.json";
const MODEL_FILE: &str = "onnx/model.onnx";
const MAX_SEQUENCE_LENGTH: usize = 512;

pub struct OnnxEmbedder {
  // ort sessions take &mut to run
  session: Mutex<Session>,
  tokenizer: Tokenizer,
}

struct ModelFiles {
  tokenizer_file: PathBuf,
  model_path: PathBuf,
}

impl OnnxEmbedder {
  /// Load the MiniLM model from HuggingFace
  pub async fn load() -> Result<Self> {
    tracing::info!(model = MODEL_NAME, "loading embedding model");

    let files = Self::download_model().await?;
    let tokenizer = Self::load_tokenizer(files.tokenizer_file)?;
    let session = Self::load_session(files.model_path)?;

    Ok(Self { session: Mutex::new(session), tokenizer })
  }

  async fn download_model() -> Result<ModelFiles> {
    let api = Api::new().map_err(|e| anyhow!("HF API initialization failed: {}", e))?;
    let repo = api.model(MODEL_NAME.to_string());

    let tokenizer_file =
      repo.get(TOKENIZER_FILE).await.map_err(|e| anyhow!("Failed to download tokenizer: {}", e))?;
    let model_path =
      repo.get(MODEL_FILE).await.map_err(|e| anyhow!("Failed to download ONNX model: {}", e))?;

    Ok(ModelFiles { tokenizer_file, model_path })
  }

  fn load_tokenizer(path: PathBuf) -> Result<Tokenizer> {
    Tokenizer::from_file(path).map_err(|e| anyhow!("Failed to load tokenizer: {}", e))
  }

  fn load_session(model_path: PathBuf) -> Result<Session> {
    let session = Session::builder()?
      .with_execution_providers([CPUExecutionProvider::default().into()])?
      .commit_from_file(model_path)?;
    Ok(session)
  }

  fn embed_sync(&self, text: &str) -> Result<Vec<f32>> {
    let encoding =
      self.tokenizer.encode(text, true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;

    if encoding.get_ids().len() > MAX_SEQUENCE_LENGTH {
      tracing::warn!(
        tokens = encoding.get_ids().len(),
        "input exceeds the model's sequence limit; tail tokens are dropped"
      );
    }

    let attention_mask = encoding.get_attention_mask().to_vec();
    let input = Self::prepare_input(&encoding)?;

    let mut session =
      self.session.lock().map_err(|_| anyhow!("Embedding session lock poisoned"))?;
    let output = session.run(input)?;

    let tensor = output
      .get("last_hidden_state")
      .or_else(|| output.get("0"))
      .ok_or_else(|| anyhow!("No output found from model - expected 'last_hidden_state' or '0'"))?;
    let (shape, data) = tensor.try_extract_tensor::<f32>()?;

    let pooled = mean_pool(shape.as_ref(), data, &attention_mask)?;
    Ok(normalize(pooled))
  }

  fn prepare_input(encoding: &tokenizers::Encoding) -> Result<HashMap<String, Value>> {
    let mut input = HashMap::new();
    input.insert("input_ids".to_string(), to_tensor(encoding.get_ids())?);
    input.insert("attention_mask".to_string(), to_tensor(encoding.get_attention_mask())?);
    input.insert("token_type_ids".to_string(), to_tensor(encoding.get_type_ids())?);
    Ok(input)
  }
}

fn to_tensor(values: &[u32]) -> Result<Value> {
  let seq_len = values.len();
  let as_i64: Vec<i64> = values.iter().map(|&x| i64::from(x)).collect();
  let array: Array2<i64> = Array2::from_shape_vec((1, seq_len), as_i64)?;
  let tensor: Value = Value::from_array(array)?.into();
  Ok(tensor)
}

/// Mean pooling over the sequence dimension, weighted by attention mask
fn mean_pool(shape: &[i64], data: &[f32], attention_mask: &[u32]) -> Result<Vec<f32>> {
  if shape.len() != 3 {
    return Err(anyhow!("Unexpected model output shape: {:?}", shape));
  }

  let seq_length = shape[1] as usize;
  let hidden_size = shape[2] as usize;

  let mut embedding = vec![0.0f32; hidden_size];
  let mut token_count = 0.0f32;

  for token_idx in 0..seq_length {
    if attention_mask.get(token_idx).copied().unwrap_or(0) == 0 {
      continue;
    }
    token_count += 1.0;

    let start = token_idx * hidden_size;
    for (i, &value) in data[start..start + hidden_size].iter().enumerate() {
      embedding[i] += value;
    }
  }

  if token_count == 0.0 {
    return Err(anyhow!("Attention mask masked out every token"));
  }

  for value in embedding.iter_mut() {
    *value /= token_count;
  }

  Ok(embedding)
}

#[async_trait]
impl TextEmbedder for OnnxEmbedder {
  async fn embed(&self, text: &str) -> Result<Vec<f32>> {
    self.embed_sync(text)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mean_pool_respects_attention_mask() {
    // two tokens, hidden size 2; second token is padding
    let shape = [1i64, 2, 2];
    let data = [1.0f32, 3.0, 100.0, 100.0];
    let mask = [1u32, 0];

    let pooled = mean_pool(&shape, &data, &mask).unwrap();
    assert_eq!(pooled, vec![1.0, 3.0]);
  }

  #[test]
  fn mean_pool_rejects_fully_masked_input() {
    let shape = [1i64, 1, 2];
    let data = [1.0f32, 2.0];
    assert!(mean_pool(&shape, &data, &[0]).is_err());
  }
}
