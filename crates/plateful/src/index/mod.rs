//! Vector index abstraction
//!
//! Stores (embedding, document, metadata, id) tuples and answers
//! k-nearest-neighbor queries, optionally restricted by metadata
//! predicates. Implementations can be swapped without touching the
//! pipeline: LanceDB for persistence, a brute-force in-memory scan for
//! small datasets and tests. Both report cosine distance.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod memory;

#[cfg(feature = "ml-features")]
pub mod lance;

use crate::compose;
use crate::record::Record;

/// Flattened scalar metadata attached to an indexed entry
///
/// The index's metadata values are scalars only, so list-valued fields
/// travel as comma-delimited strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMetadata {
  pub post_id: String,
  pub permalink: String,
  pub media_type: String,
  pub timestamp: String,
  pub like_count: u32,
  pub comments_count: u32,
  pub hashtags: String,
  pub ingredients: String,
}

impl PostMetadata {
  pub fn from_record(record: &Record) -> Self {
    Self {
      post_id: record.id.clone(),
      permalink: record.permalink.clone(),
      media_type: record.media_type.clone(),
      timestamp: record.timestamp.clone(),
      like_count: record.like_count,
      comments_count: record.comments_count,
      hashtags: compose::join_tags(&record.hashtags),
      ingredients: compose::join_tags(&record.ingredients),
    }
  }
}

/// The unit stored in the vector index
#[derive(Debug, Clone)]
pub struct IndexedEntry {
  pub id: String,
  pub document: String,
  pub embedding: Vec<f32>,
  pub metadata: PostMetadata,
}

/// One raw nearest-neighbor hit, rank-ordered by ascending distance
#[derive(Debug, Clone)]
pub struct IndexHit {
  pub document: String,
  pub metadata: PostMetadata,
  /// Cosine distance in [0, 2]; the pipeline converts it to a score
  pub distance: f32,
}

/// Metadata predicate applied before ranking
///
/// Equality for the categorical field, greater-or-equal for the numeric
/// one. Entries must match every present clause.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
  pub media_type: Option<String>,
  pub min_likes: Option<u32>,
}

impl SearchFilter {
  pub fn is_empty(&self) -> bool {
    self.media_type.is_none() && self.min_likes.is_none()
  }

  pub fn matches(&self, metadata: &PostMetadata) -> bool {
    if let Some(media_type) = &self.media_type {
      if &metadata.media_type != media_type {
        return false;
      }
    }
    if let Some(min_likes) = self.min_likes {
      if metadata.like_count < min_likes {
        return false;
      }
    }
    true
  }
}

/// Index failures, kept distinct from a successful empty result
#[derive(Debug, Error)]
pub enum IndexError {
  /// No index has been built yet; user-actionable, not a crash
  #[error("no index found; build the index first")]
  Missing,

  #[error("index rebuild failed: {0}")]
  Rebuild(#[source] anyhow::Error),

  #[error("index query failed: {0}")]
  Query(#[source] anyhow::Error),
}

/// Nearest-neighbor index over embedded documents
#[async_trait]
pub trait VectorIndex: Send + Sync {
  /// Atomically replace the entire index content
  ///
  /// Drop-then-recreate, not a merge: afterwards the index contains
  /// exactly the given entries. Rebuilding an index that is being
  /// served is not supported; build and serve are separate invocations.
  async fn rebuild(&self, entries: Vec<IndexedEntry>) -> Result<(), IndexError>;

  /// Return up to `top_k` nearest entries by cosine distance
  ///
  /// Entries failing any filter clause are excluded before ranking.
  /// Fewer matches than `top_k` is a valid result, not an error.
  async fn query(
    &self,
    embedding: &[f32],
    top_k: usize,
    filter: Option<&SearchFilter>,
  ) -> Result<Vec<IndexHit>, IndexError>;

  /// Number of entries currently indexed
  async fn count(&self) -> Result<usize, IndexError>;
}
