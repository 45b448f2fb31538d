//! LanceDB adapter for the vector index
//!
//! Persists indexed posts in a LanceDB table and serves nearest-neighbor
//! queries over them with cosine distance. Rebuild is drop-then-recreate:
//! the table is deleted and bulk-loaded from scratch, never merged.

pub mod records;
pub mod search;
pub mod table;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use lancedb::{connect, Connection};
use std::path::PathBuf;

use super::{IndexError, IndexHit, IndexedEntry, SearchFilter, VectorIndex};
use search::search_nearest;
use table::TableManager;

/// Fallback schema dimension for an index rebuilt from zero records
pub const DEFAULT_DIMENSION: usize = 384;

pub struct LanceIndex {
  table_manager: TableManager,
}

impl LanceIndex {
  /// Open (or create) a LanceDB index rooted at `data_dir`
  pub async fn open(data_dir: PathBuf, table_name: &str) -> Result<Self, IndexError> {
    let connection = open_connection(data_dir).await.map_err(IndexError::Rebuild)?;
    let table_manager = TableManager::new(connection, table_name.to_string());
    Ok(Self { table_manager })
  }
}

async fn open_connection(data_dir: PathBuf) -> Result<Connection> {
  std::fs::create_dir_all(&data_dir)
    .map_err(|e| anyhow!("Failed to create index directory '{}': {e}", data_dir.display()))?;

  connect(&data_dir.to_string_lossy())
    .execute()
    .await
    .map_err(|e| anyhow!("Failed to open LanceDB at '{}': {e}", data_dir.display()))
}

#[async_trait]
impl VectorIndex for LanceIndex {
  async fn rebuild(&self, entries: Vec<IndexedEntry>) -> Result<(), IndexError> {
    let dimension = entries.first().map(|e| e.embedding.len()).unwrap_or(DEFAULT_DIMENSION);

    if let Some(bad) = entries.iter().find(|e| e.embedding.len() != dimension) {
      return Err(IndexError::Rebuild(anyhow!(
        "entry '{}' has dimension {}, expected {}",
        bad.id,
        bad.embedding.len(),
        dimension
      )));
    }

    self.table_manager.recreate_table(entries, dimension).await.map_err(IndexError::Rebuild)
  }

  async fn query(
    &self,
    embedding: &[f32],
    top_k: usize,
    filter: Option<&SearchFilter>,
  ) -> Result<Vec<IndexHit>, IndexError> {
    if !self.table_manager.table_exists().await.map_err(IndexError::Query)? {
      return Err(IndexError::Missing);
    }

    let table = self.table_manager.get_table().await.map_err(IndexError::Query)?;
    search_nearest(&table, embedding, top_k, filter).await.map_err(IndexError::Query)
  }

  async fn count(&self) -> Result<usize, IndexError> {
    if !self.table_manager.table_exists().await.map_err(IndexError::Query)? {
      return Err(IndexError::Missing);
    }

    let table = self.table_manager.get_table().await.map_err(IndexError::Query)?;
    table.count_rows(None).await.map_err(|e| IndexError::Query(anyhow!(e)))
  }
}
