//! Deterministic hashing embedder
//!
//! A bag-of-words stand-in for the real model: each token hashes into a
//! fixed bucket, the bucket counts are normalized to unit length. Texts
//! sharing vocabulary land close together, identical texts land on the
//! exact same vector. Used by tests and offline development; it makes
//! no claim to semantic quality.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::{normalize, TextEmbedder};

/// Output dimension, matching the production model's 384
pub const MOCK_DIMENSION: usize = 384;

#[derive(Debug, Clone)]
pub struct MockEmbedder {
  dimension: usize,
}

impl Default for MockEmbedder {
  fn default() -> Self {
    Self::new()
  }
}

impl MockEmbedder {
  pub fn new() -> Self {
    Self { dimension: MOCK_DIMENSION }
  }

  /// Build a mock embedder with a custom dimension
  pub fn with_dimension(dimension: usize) -> Self {
    Self { dimension }
  }

  fn bucket(&self, token: &str) -> usize {
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    (hasher.finish() as usize) % self.dimension
  }
}

#[async_trait]
impl TextEmbedder for MockEmbedder {
  async fn embed(&self, text: &str) -> Result<Vec<f32>> {
    let mut embedding = vec![0.0f32; self.dimension];

    for token in text.to_lowercase().split(|c: char| !c.is_alphanumeric()) {
      if token.is_empty() {
        continue;
      }
      embedding[self.bucket(token)] += 1.0;
    }

    Ok(normalize(embedding))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn identical_text_yields_identical_vectors() {
    let embedder = MockEmbedder::new();
    let a = embedder.embed("pork belly rice").await.unwrap();
    let b = embedder.embed("pork belly rice").await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), MOCK_DIMENSION);
  }

  #[tokio::test]
  async fn vectors_are_unit_length() {
    let embedder = MockEmbedder::new();
    let embedding = embedder.embed("carrot salad with herbs").await.unwrap();
    let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((magnitude - 1.0).abs() < 1e-5);
  }

  #[tokio::test]
  async fn batch_matches_single_calls() {
    let embedder = MockEmbedder::new();
    let texts = vec!["one".to_string(), "two".to_string()];
    let batch = embedder.embed_batch(&texts).await.unwrap();
    assert_eq!(batch[0], embedder.embed("one").await.unwrap());
    assert_eq!(batch[1], embedder.embed("two").await.unwrap());
  }
}
