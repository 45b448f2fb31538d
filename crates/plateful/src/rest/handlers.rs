//! Endpoint handlers

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::Json as ResponseJson;
use std::sync::Arc;
use uuid::Uuid;

use crate::rest::types::{ApiError, SearchRequestBody, SearchResponse, StatusResponse};
use crate::search::{SearchEngine, SearchError, SearchRequest};

/// POST /search - run one semantic search
pub async fn search(
  State(engine): State<Arc<SearchEngine>>,
  Json(body): Json<SearchRequestBody>,
) -> Result<ResponseJson<SearchResponse>, (StatusCode, ResponseJson<ApiError>)> {
  let request = SearchRequest::from(body);

  match engine.search(&request).await {
    Ok(results) => {
      Ok(ResponseJson(SearchResponse { transaction_id: Uuid::new_v4(), results }))
    }
    Err(e) => Err(to_api_error(e)),
  }
}

/// GET /status - index state and version
pub async fn status(State(engine): State<Arc<SearchEngine>>) -> ResponseJson<StatusResponse> {
  let indexed_posts = engine.indexed_count().await.ok();

  ResponseJson(StatusResponse {
    version: env!("CARGO_PKG_VERSION").to_string(),
    indexed_posts,
  })
}

/// Map pipeline failures to HTTP statuses
///
/// A missing index is the caller's situation to fix, not a server
/// fault; everything else is a 500 with a diagnostic detail.
fn to_api_error(error: SearchError) -> (StatusCode, ResponseJson<ApiError>) {
  match &error {
    SearchError::MissingIndex => (
      StatusCode::CONFLICT,
      ResponseJson(ApiError::new("index_missing", &error.to_string())),
    ),
    SearchError::Embedding(_) => (
      StatusCode::INTERNAL_SERVER_ERROR,
      ResponseJson(ApiError::new("embedding_failed", &error.to_string())),
    ),
    SearchError::Index(_) => (
      StatusCode::INTERNAL_SERVER_ERROR,
      ResponseJson(ApiError::new("index_query_failed", &error.to_string())),
    ),
  }
}
