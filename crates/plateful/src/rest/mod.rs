//! REST API for the search pipeline
//!
//! Exposes the query interface the presentation layer consumes. Uses
//! axum for routing; the search engine is shared process-wide state.

pub mod handlers;
pub mod routing;
pub mod server;
pub mod types;
