//! Axum router configuration

use axum::{
  routing::{get, post},
  Router,
};
use std::sync::Arc;

use crate::rest::handlers;
use crate::search::SearchEngine;

/// Create the application router with the shared search engine
pub fn create_router(engine: Arc<SearchEngine>) -> Router {
  Router::new()
    .route("/status", get(handlers::status))
    .route("/search", post(handlers::search))
    .with_state(engine)
}
