//! Brute-force in-memory vector index
//!
//! Scans every entry and ranks by cosine distance. Fine for demo-sized
//! datasets and the default index for tests; implements the same
//! contract as the LanceDB adapter, including the distinction between
//! "never built" and "built but empty".

use async_trait::async_trait;
use std::sync::RwLock;

use super::{IndexError, IndexHit, IndexedEntry, SearchFilter, VectorIndex};

#[derive(Debug, Default)]
pub struct MemoryIndex {
  // None until the first rebuild; an empty Vec is a built, empty index
  entries: RwLock<Option<Vec<IndexedEntry>>>,
}

impl MemoryIndex {
  pub fn new() -> Self {
    Self::default()
  }
}

/// Cosine distance between two vectors, in [0, 2]
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
  let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
  let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
  let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

  if norm_a == 0.0 || norm_b == 0.0 {
    return 1.0;
  }

  1.0 - dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for MemoryIndex {
  async fn rebuild(&self, entries: Vec<IndexedEntry>) -> Result<(), IndexError> {
    let mut guard = self
      .entries
      .write()
      .map_err(|_| IndexError::Rebuild(anyhow::anyhow!("index lock poisoned")))?;
    *guard = Some(entries);
    Ok(())
  }

  async fn query(
    &self,
    embedding: &[f32],
    top_k: usize,
    filter: Option<&SearchFilter>,
  ) -> Result<Vec<IndexHit>, IndexError> {
    let guard = self
      .entries
      .read()
      .map_err(|_| IndexError::Query(anyhow::anyhow!("index lock poisoned")))?;
    let entries = guard.as_ref().ok_or(IndexError::Missing)?;

    let mut hits: Vec<IndexHit> = entries
      .iter()
      .filter(|entry| filter.is_none_or(|f| f.matches(&entry.metadata)))
      .map(|entry| IndexHit {
        document: entry.document.clone(),
        metadata: entry.metadata.clone(),
        distance: cosine_distance(embedding, &entry.embedding),
      })
      .collect();

    hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal));
    hits.truncate(top_k);

    Ok(hits)
  }

  async fn count(&self) -> Result<usize, IndexError> {
    let guard = self
      .entries
      .read()
      .map_err(|_| IndexError::Query(anyhow::anyhow!("index lock poisoned")))?;
    let entries = guard.as_ref().ok_or(IndexError::Missing)?;
    Ok(entries.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cosine_distance_of_identical_vectors_is_zero() {
    let v = vec![0.6, 0.8, 0.0];
    assert!(cosine_distance(&v, &v).abs() < 1e-6);
  }

  #[test]
  fn cosine_distance_of_orthogonal_vectors_is_one() {
    let a = vec![1.0, 0.0];
    let b = vec![0.0, 1.0];
    assert!((cosine_distance(&a, &b) - 1.0).abs() < 1e-6);
  }

  #[tokio::test]
  async fn query_before_rebuild_is_missing_index() {
    let index = MemoryIndex::new();
    let result = index.query(&[1.0, 0.0], 3, None).await;
    assert!(matches!(result, Err(IndexError::Missing)));
  }
}
