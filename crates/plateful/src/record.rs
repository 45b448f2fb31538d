//! Record store: raw post records and their CSV/JSON loaders

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One raw content record before embedding
///
/// `hashtags` and `ingredients` keep the order they were authored in;
/// search does not care about the order but display does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
  pub id: String,
  pub caption: String,
  pub media_type: String,
  pub permalink: String,
  #[serde(default)]
  pub timestamp: String,
  #[serde(default)]
  pub like_count: u32,
  #[serde(default)]
  pub comments_count: u32,
  #[serde(default)]
  pub hashtags: Vec<String>,
  #[serde(default)]
  pub ingredients: Vec<String>,
}

/// Flattened row shape of the tabular fixture file
///
/// List-valued fields are comma-delimited strings in the CSV form.
#[derive(Debug, Serialize, Deserialize)]
pub struct CsvRecord {
  pub id: String,
  pub caption: String,
  pub media_type: String,
  pub permalink: String,
  #[serde(default)]
  pub timestamp: String,
  #[serde(default)]
  pub like_count: u32,
  #[serde(default)]
  pub comments_count: u32,
  #[serde(default)]
  pub hashtags: String,
  #[serde(default)]
  pub ingredients: String,
}

impl From<Record> for CsvRecord {
  fn from(record: Record) -> Self {
    Self {
      id: record.id,
      caption: record.caption,
      media_type: record.media_type,
      permalink: record.permalink,
      timestamp: record.timestamp,
      like_count: record.like_count,
      comments_count: record.comments_count,
      hashtags: crate::compose::join_tags(&record.hashtags),
      ingredients: crate::compose::join_tags(&record.ingredients),
    }
  }
}

impl From<CsvRecord> for Record {
  fn from(row: CsvRecord) -> Self {
    Self {
      id: row.id,
      caption: row.caption,
      media_type: row.media_type,
      permalink: row.permalink,
      timestamp: row.timestamp,
      like_count: row.like_count,
      comments_count: row.comments_count,
      hashtags: crate::compose::split_tags(&row.hashtags),
      ingredients: crate::compose::split_tags(&row.ingredients),
    }
  }
}

/// Load records from the tabular fixture form
pub fn load_csv(path: &Path) -> Result<Vec<Record>> {
  let mut reader = csv::Reader::from_path(path)
    .map_err(|e| anyhow!("Failed to open records file '{}': {}", path.display(), e))?;

  let mut records = Vec::new();
  for row in reader.deserialize::<CsvRecord>() {
    let row = row.map_err(|e| anyhow!("Malformed record row: {}", e))?;
    records.push(Record::from(row));
  }

  Ok(records)
}

/// Load records from the structured fixture form
pub fn load_json(path: &Path) -> Result<Vec<Record>> {
  let content = std::fs::read_to_string(path)
    .map_err(|e| anyhow!("Failed to read records file '{}': {}", path.display(), e))?;

  serde_json::from_str(&content).map_err(|e| anyhow!("Malformed records file: {}", e))
}
