//! Query pipeline: query text -> embedding -> index -> display entries
//!
//! Stateless per call; each search is independent and idempotent given
//! an unchanged index.

use std::sync::Arc;
use thiserror::Error;

use crate::compose;
use crate::embedding::TextEmbedder;
use crate::index::{IndexError, IndexHit, SearchFilter, VectorIndex};

/// Sentinel media-type value meaning "do not filter"
pub const MEDIA_TYPE_ALL: &str = "all";

/// Default number of results when the caller does not say
pub const DEFAULT_TOP_K: usize = 3;

/// Upper bound on requested results
pub const MAX_TOP_K: usize = 20;

/// Parameters of one search call
#[derive(Debug, Clone)]
pub struct SearchRequest {
  pub query: String,
  pub top_k: usize,
  /// Exact media-type match; `None` or the "all" sentinel disables it
  pub media_type: Option<String>,
  /// Minimum like-count; `None` or zero disables it
  pub min_likes: Option<u32>,
}

impl SearchRequest {
  pub fn new(query: impl Into<String>) -> Self {
    Self { query: query.into(), top_k: DEFAULT_TOP_K, media_type: None, min_likes: None }
  }
}

/// One ranked search result, ready for display
#[derive(Debug, Clone, serde::Serialize)]
pub struct SearchHit {
  pub title: String,
  /// Composed document text, truncated to the display bound
  pub document: String,
  pub permalink: String,
  pub hashtags: Vec<String>,
  pub ingredients: Vec<String>,
  pub like_count: u32,
  pub comments_count: u32,
  /// Formatted post date, or the raw timestamp if it did not parse
  pub date: String,
  /// 1 - cosine distance, clamped to [0, 1]
  pub similarity: f32,
}

/// Failures surfaced at the pipeline boundary
///
/// Zero matches is not an error; it is a successful empty result.
#[derive(Debug, Error)]
pub enum SearchError {
  #[error("no recipe index found; run the index step first")]
  MissingIndex,

  #[error("embedding the query failed: {0}")]
  Embedding(#[source] anyhow::Error),

  #[error("querying the index failed: {0}")]
  Index(#[source] IndexError),
}

/// Long-lived search pipeline over one embedder and one index
///
/// Both handles are constructed once per process and shared; the
/// pipeline itself keeps no state between calls.
pub struct SearchEngine {
  embedder: Arc<dyn TextEmbedder>,
  index: Arc<dyn VectorIndex>,
}

impl SearchEngine {
  pub fn new(embedder: Arc<dyn TextEmbedder>, index: Arc<dyn VectorIndex>) -> Self {
    Self { embedder, index }
  }

  /// Run one search call end to end
  pub async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, SearchError> {
    // A blank query is a no-op, not an error; it must never be embedded
    if request.query.trim().is_empty() {
      return Ok(Vec::new());
    }

    let top_k = request.top_k.clamp(1, MAX_TOP_K);
    let filter = build_filter(request);

    let embedding =
      self.embedder.embed(&request.query).await.map_err(SearchError::Embedding)?;

    let hits = self
      .index
      .query(&embedding, top_k, filter.as_ref())
      .await
      .map_err(|e| match e {
        IndexError::Missing => SearchError::MissingIndex,
        other => SearchError::Index(other),
      })?;

    Ok(hits.into_iter().map(to_search_hit).collect())
  }

  /// Number of indexed entries, for status reporting
  pub async fn indexed_count(&self) -> Result<usize, SearchError> {
    self.index.count().await.map_err(|e| match e {
      IndexError::Missing => SearchError::MissingIndex,
      other => SearchError::Index(other),
    })
  }
}

/// Build the metadata predicate from the recognized request options
///
/// Returns `None` when every clause is disabled, so the index never
/// sees an empty-but-present filter object.
fn build_filter(request: &SearchRequest) -> Option<SearchFilter> {
  let media_type = request
    .media_type
    .as_deref()
    .filter(|value| !value.eq_ignore_ascii_case(MEDIA_TYPE_ALL) && !value.is_empty())
    .map(str::to_string);

  let min_likes = request.min_likes.filter(|&likes| likes > 0);

  let filter = SearchFilter { media_type, min_likes };
  if filter.is_empty() {
    None
  } else {
    Some(filter)
  }
}

/// Map a raw index hit to a display entry
fn to_search_hit(hit: IndexHit) -> SearchHit {
  SearchHit {
    title: compose::extract_title(&hit.document),
    document: compose::truncate_document(&hit.document),
    permalink: hit.metadata.permalink,
    hashtags: compose::split_tags(&hit.metadata.hashtags),
    ingredients: compose::split_tags(&hit.metadata.ingredients),
    like_count: hit.metadata.like_count,
    comments_count: hit.metadata.comments_count,
    date: compose::format_date(&hit.metadata.timestamp),
    similarity: (1.0 - hit.distance).clamp(0.0, 1.0),
  }
}
