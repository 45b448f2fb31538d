//! Embedding provider abstraction
//!
//! The embedder is a capability interface: text in, fixed-dimension
//! vector out. The same provider (same model identity) must serve both
//! the build step and the query step; mixing models across the two is a
//! configuration error the index surfaces as a dimension mismatch.

use anyhow::Result;
use async_trait::async_trait;

pub mod mock;

#[cfg(feature = "ml-features")]
pub mod onnx;

/// Maps a string to a fixed-length numeric vector
///
/// Batched and single-item calls are semantically equivalent; there is
/// no cross-item interaction.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
  /// Embed a single text
  async fn embed(&self, text: &str) -> Result<Vec<f32>>;

  /// Embed a batch of texts, one vector per input, in order
  async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
    let mut embeddings = Vec::with_capacity(texts.len());
    for text in texts {
      embeddings.push(self.embed(text).await?);
    }
    Ok(embeddings)
  }
}

/// Normalize an embedding to unit length for cosine comparisons
pub fn normalize(mut embedding: Vec<f32>) -> Vec<f32> {
  let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

  if magnitude < f32::EPSILON {
    return embedding;
  }

  for value in embedding.iter_mut() {
    *value /= magnitude;
  }
  embedding
}
