//! REST server startup

use anyhow::Result;
use axum::serve;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::rest::routing::create_router;
use crate::search::SearchEngine;

/// Start serving the search API
///
/// Blocks until the server shuts down. The engine handle is shared by
/// every request; the pipeline itself is stateless per call.
pub async fn start_server(addr: SocketAddr, engine: Arc<SearchEngine>) -> Result<()> {
  tracing::info!(%addr, "starting search server");

  let app = create_router(engine)
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()));

  let listener = TcpListener::bind(addr).await?;
  tracing::info!(%addr, "server listening");

  serve(listener, app).await.map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
