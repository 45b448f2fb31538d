//! REST request/response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::search::{SearchHit, SearchRequest, DEFAULT_TOP_K};

/// Body of `POST /search`
#[derive(Debug, Deserialize)]
pub struct SearchRequestBody {
  pub query: String,
  #[serde(default = "default_top_k")]
  pub top_k: usize,
  #[serde(default)]
  pub media_type: Option<String>,
  #[serde(default)]
  pub min_likes: Option<u32>,
}

fn default_top_k() -> usize {
  DEFAULT_TOP_K
}

impl From<SearchRequestBody> for SearchRequest {
  fn from(body: SearchRequestBody) -> Self {
    Self {
      query: body.query,
      top_k: body.top_k,
      media_type: body.media_type,
      min_likes: body.min_likes,
    }
  }
}

/// Response of `POST /search`
#[derive(Debug, Serialize)]
pub struct SearchResponse {
  /// Transaction ID for logging correlation
  pub transaction_id: Uuid,
  pub results: Vec<SearchHit>,
}

/// Response of `GET /status`
#[derive(Debug, Serialize)]
pub struct StatusResponse {
  pub version: String,
  /// Entries currently indexed; `None` while no index has been built
  pub indexed_posts: Option<usize>,
}

/// Error envelope for failed requests
#[derive(Debug, Serialize)]
pub struct ApiError {
  pub transaction_id: Uuid,
  /// Error key, unique to the error source
  pub key: String,
  /// Human readable error message
  pub message: String,
}

impl ApiError {
  pub fn new(key: &str, message: &str) -> Self {
    Self { transaction_id: Uuid::new_v4(), key: key.to_string(), message: message.to_string() }
  }
}
