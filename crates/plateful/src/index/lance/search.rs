//! Nearest-neighbor query execution and result decoding

use anyhow::{anyhow, Error, Result};
use arrow::array::{Array, Float32Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use futures::stream::StreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{DistanceType, Table};

use crate::index::{IndexHit, PostMetadata, SearchFilter};

/// Run a cosine nearest-neighbor query against the posts table
///
/// The filter, when present, pushes down as a SQL predicate so
/// non-matching entries are excluded before ranking. No filter clause
/// means no predicate at all; an empty predicate is never passed.
pub async fn search_nearest(
  table: &Table,
  query_embedding: &[f32],
  top_k: usize,
  filter: Option<&SearchFilter>,
) -> Result<Vec<IndexHit>, Error> {
  let mut query = table
    .vector_search(query_embedding)
    .map_err(|e| anyhow!("Vector search setup failed: {}", e))?
    .column("embedding")
    .distance_type(DistanceType::Cosine)
    .limit(top_k);

  if let Some(sql) = filter.and_then(filter_to_sql) {
    query = query.only_if(sql);
  }

  let mut stream =
    query.execute().await.map_err(|e| anyhow!("Vector search failed: {}", e))?;

  let mut hits = Vec::new();
  while let Some(batch) = stream.next().await {
    let batch = batch.map_err(|e| anyhow!("Error reading result batch: {}", e))?;
    decode_batch(&batch, &mut hits)?;
  }

  Ok(hits)
}

/// Render the metadata predicate as a SQL `WHERE` expression
fn filter_to_sql(filter: &SearchFilter) -> Option<String> {
  let mut clauses = Vec::new();

  if let Some(media_type) = &filter.media_type {
    clauses.push(format!("media_type = '{}'", media_type.replace('\'', "''")));
  }
  if let Some(min_likes) = filter.min_likes {
    clauses.push(format!("like_count >= {min_likes}"));
  }

  if clauses.is_empty() {
    None
  } else {
    Some(clauses.join(" AND "))
  }
}

fn decode_batch(batch: &RecordBatch, hits: &mut Vec<IndexHit>) -> Result<()> {
  let document = string_column(batch, "document")?;
  let post_id = string_column(batch, "post_id")?;
  let permalink = string_column(batch, "permalink")?;
  let media_type = string_column(batch, "media_type")?;
  let timestamp = string_column(batch, "timestamp")?;
  let like_count = int_column(batch, "like_count")?;
  let comments_count = int_column(batch, "comments_count")?;
  let hashtags = string_column(batch, "hashtags")?;
  let ingredients = string_column(batch, "ingredients")?;
  let distance = distance_column(batch);

  for row in 0..batch.num_rows() {
    hits.push(IndexHit {
      document: document.value(row).to_string(),
      metadata: PostMetadata {
        post_id: post_id.value(row).to_string(),
        permalink: permalink.value(row).to_string(),
        media_type: media_type.value(row).to_string(),
        timestamp: timestamp.value(row).to_string(),
        like_count: like_count.value(row).max(0) as u32,
        comments_count: comments_count.value(row).max(0) as u32,
        hashtags: hashtags.value(row).to_string(),
        ingredients: ingredients.value(row).to_string(),
      },
      distance: extract_distance(distance, row),
    });
  }

  Ok(())
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
  batch
    .column_by_name(name)
    .ok_or_else(|| anyhow!("Missing '{}' column", name))?
    .as_any()
    .downcast_ref::<StringArray>()
    .ok_or_else(|| anyhow!("Failed to cast '{}' column to StringArray", name))
}

fn int_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Int64Array> {
  batch
    .column_by_name(name)
    .ok_or_else(|| anyhow!("Missing '{}' column", name))?
    .as_any()
    .downcast_ref::<Int64Array>()
    .ok_or_else(|| anyhow!("Failed to cast '{}' column to Int64Array", name))
}

/// LanceDB reports the distance in a `_distance` column
fn distance_column(batch: &RecordBatch) -> Option<&Float32Array> {
  batch.column_by_name("_distance").and_then(|col| col.as_any().downcast_ref::<Float32Array>())
}

fn extract_distance(distances: Option<&Float32Array>, row: usize) -> f32 {
  match distances {
    Some(array) if row < array.len() && !array.is_null(row) => array.value(row),
    // Missing distance ranks at the far end rather than faking a match
    _ => 2.0,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn filter_sql_combines_clauses() {
    let filter =
      SearchFilter { media_type: Some("IMAGE".to_string()), min_likes: Some(500) };
    assert_eq!(
      filter_to_sql(&filter).unwrap(),
      "media_type = 'IMAGE' AND like_count >= 500"
    );
  }

  #[test]
  fn empty_filter_produces_no_predicate() {
    assert!(filter_to_sql(&SearchFilter::default()).is_none());
  }

  #[test]
  fn filter_sql_escapes_quotes() {
    let filter = SearchFilter { media_type: Some("O'BRIEN".to_string()), min_likes: None };
    assert_eq!(filter_to_sql(&filter).unwrap(), "media_type = 'O''BRIEN'");
  }
}
