//! CLI command implementations

use anyhow::{anyhow, Result};
use colored::*;

use crate::search::SearchRequest;
use crate::{config, fixtures};

#[cfg(feature = "ml-features")]
use crate::record;
#[cfg(feature = "ml-features")]
use crate::search::{SearchEngine, SearchError, SearchHit};
#[cfg(feature = "ml-features")]
use std::sync::Arc;

/// Generate the mock fixture files
pub fn generate_mock_data() -> Result<()> {
  println!("Creating mock Instagram data...");

  let posts = fixtures::mock_posts();
  let data_dir = config::data_dir()?;
  fixtures::write_fixtures(&data_dir, &posts)?;

  println!(
    "{} Created mock dataset with {} posts in {}",
    "✓".green(),
    posts.len(),
    data_dir.display().to_string().cyan()
  );
  Ok(())
}

/// Load the fixture records, with a user-actionable error when absent
#[cfg(feature = "ml-features")]
fn load_records() -> Result<Vec<record::Record>> {
  let csv_path = config::posts_csv_path()?;
  if !csv_path.exists() {
    return Err(anyhow!(
      "No data found at '{}'. Run the mock-data step first.",
      csv_path.display()
    ));
  }

  let records = record::load_csv(&csv_path)?;
  println!("Loaded {} posts from CSV file", records.len());
  Ok(records)
}

/// Print one result the way the original UI laid it out
#[cfg(feature = "ml-features")]
fn display_hit(rank: usize, hit: &SearchHit) {
  println!("{}", format!("=== {}. {} ===", rank, hit.title).blue().bold());
  println!(
    "Likes: {}   Comments: {}   {}",
    hit.like_count.to_string().yellow(),
    hit.comments_count,
    hit.date
  );
  println!("{}", hit.document);

  if !hit.ingredients.is_empty() {
    println!("{} {}", "Main Ingredients:".bold(), hit.ingredients.join(", ").italic());
  }
  if !hit.hashtags.is_empty() {
    let tags: Vec<String> = hit.hashtags.iter().map(|tag| format!("#{tag}")).collect();
    println!("{}", tags.join(" ").cyan());
  }

  println!("{} {:.1}%", "Match score:".bold(), hit.similarity * 100.0);
  println!();
}

#[cfg(feature = "ml-features")]
fn display_results(hits: &[SearchHit], as_json: bool) -> Result<()> {
  if as_json {
    println!("{}", serde_json::to_string_pretty(hits)?);
    return Ok(());
  }

  if hits.is_empty() {
    println!("{}", "No matching recipes found with the current filters.".yellow());
    return Ok(());
  }

  for (i, hit) in hits.iter().enumerate() {
    display_hit(i + 1, hit);
  }
  Ok(())
}

#[cfg(feature = "ml-features")]
async fn run_engine_search(
  engine: &SearchEngine,
  request: &SearchRequest,
  as_json: bool,
) -> Result<()> {
  match engine.search(request).await {
    Ok(hits) => display_results(&hits, as_json),
    Err(e @ SearchError::MissingIndex) => Err(anyhow!("{e}. Run `plateful index` first.")),
    Err(e) => Err(anyhow!(e)),
  }
}

#[cfg(feature = "ml-features")]
mod ml {
  use super::*;
  use crate::embedding::onnx::OnnxEmbedder;
  use crate::index::lance::LanceIndex;
  use crate::index::{IndexError, VectorIndex};
  use crate::ingest;

  async fn open_index() -> Result<LanceIndex> {
    let index = LanceIndex::open(config::index_dir()?, config::TABLE_NAME).await?;
    Ok(index)
  }

  /// Build the vector index from the fixture CSV
  pub async fn build_index() -> Result<()> {
    println!("Processing Instagram data...");
    let records = load_records()?;

    let embedder = OnnxEmbedder::load().await?;
    let index = open_index().await?;

    let count = ingest::rebuild_index(&records, &embedder, &index).await?;

    println!(
      "{} Indexed {} posts into {}",
      "✓".green(),
      count,
      config::index_dir()?.display().to_string().cyan()
    );
    Ok(())
  }

  /// Run one search from the CLI
  pub async fn run_search(request: SearchRequest, as_json: bool) -> Result<()> {
    let index = open_index().await?;

    // Surface the missing-index case before paying for model load
    match index.count().await {
      Err(IndexError::Missing) => {
        return Err(anyhow!("{}. Run `plateful index` first.", SearchError::MissingIndex));
      }
      Err(e) => return Err(anyhow!(e)),
      Ok(_) => {}
    }

    let embedder = OnnxEmbedder::load().await?;
    let engine = SearchEngine::new(Arc::new(embedder), Arc::new(index));

    run_engine_search(&engine, &request, as_json).await
  }

  /// Serve the search API over HTTP
  pub async fn serve(port: u16) -> Result<()> {
    let embedder = OnnxEmbedder::load().await?;
    let index = open_index().await?;
    let engine = Arc::new(SearchEngine::new(Arc::new(embedder), Arc::new(index)));

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    crate::rest::server::start_server(addr, engine).await
  }
}

#[cfg(feature = "ml-features")]
pub use ml::{build_index, run_search, serve};

#[cfg(not(feature = "ml-features"))]
pub async fn build_index() -> Result<()> {
  Err(anyhow!("This build has no ML support; rebuild with the ml-features feature"))
}

#[cfg(not(feature = "ml-features"))]
pub async fn run_search(_request: SearchRequest, _as_json: bool) -> Result<()> {
  Err(anyhow!("This build has no ML support; rebuild with the ml-features feature"))
}

#[cfg(not(feature = "ml-features"))]
pub async fn serve(_port: u16) -> Result<()> {
  Err(anyhow!("This build has no ML support; rebuild with the ml-features feature"))
}
