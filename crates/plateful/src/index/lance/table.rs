//! Table lifecycle operations for the LanceDB index

use anyhow::{anyhow, Error, Result};
use arrow::record_batch::RecordBatchIterator;
use lancedb::{Connection, Table};

use super::records::{entries_to_arrow_batch, posts_schema};
use crate::index::IndexedEntry;

pub struct TableManager {
  connection: Connection,
  table_name: String,
}

impl TableManager {
  pub fn new(connection: Connection, table_name: String) -> Self {
    Self { connection, table_name }
  }

  /// Check if the target table exists
  pub async fn table_exists(&self) -> Result<bool, Error> {
    let tables = self
      .connection
      .table_names()
      .execute()
      .await
      .map_err(|e| anyhow!("Failed to list tables: {}", e))?;
    Ok(tables.contains(&self.table_name))
  }

  /// Get the table instance
  pub async fn get_table(&self) -> Result<Table, Error> {
    self
      .connection
      .open_table(&self.table_name)
      .execute()
      .await
      .map_err(|e| anyhow!("Failed to open table '{}': {}", self.table_name, e))
  }

  /// Drop-and-recreate the table with exactly the given entries
  ///
  /// An empty entry set still produces a table, so "built but empty"
  /// stays distinguishable from "never built".
  pub async fn recreate_table(
    &self,
    entries: Vec<IndexedEntry>,
    dimension: usize,
  ) -> Result<(), Error> {
    if self.table_exists().await? {
      self
        .connection
        .drop_table(&self.table_name, &[])
        .await
        .map_err(|e| anyhow!("Failed to drop table '{}': {}", self.table_name, e))?;
    }

    if entries.is_empty() {
      self.create_empty_table(dimension).await?;
      tracing::info!(table = %self.table_name, "created empty index table");
      return Ok(());
    }

    let count = entries.len();
    self.create_table_from_entries(&entries, dimension).await?;
    tracing::info!(table = %self.table_name, entries = count, "rebuilt index table");
    Ok(())
  }

  async fn create_empty_table(&self, dimension: usize) -> Result<(), Error> {
    self
      .connection
      .create_empty_table(&self.table_name, posts_schema(dimension))
      .execute()
      .await
      .map_err(|e| anyhow!("Failed to create empty table: {}", e))?;
    Ok(())
  }

  async fn create_table_from_entries(
    &self,
    entries: &[IndexedEntry],
    dimension: usize,
  ) -> Result<(), Error> {
    let batch = entries_to_arrow_batch(entries, dimension)?;
    let schema = batch.schema();
    let batch_iter = RecordBatchIterator::new(vec![Ok(batch)], schema);

    self
      .connection
      .create_table(&self.table_name, batch_iter)
      .execute()
      .await
      .map_err(|e| anyhow!("Failed to create table from entries: {}", e))?;
    Ok(())
  }
}
