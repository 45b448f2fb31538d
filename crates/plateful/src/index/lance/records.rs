//! Arrow RecordBatch conversion for indexed entries

use anyhow::{anyhow, Result};
use arrow::array::{Array, FixedSizeListBuilder, Float32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

use crate::index::IndexedEntry;

/// Arrow schema for the posts table at a given embedding dimension
///
/// Counts are Int64 so the metadata predicates can push down as SQL;
/// list-valued fields are stored as comma-delimited strings.
pub fn posts_schema(dimension: usize) -> Arc<Schema> {
  Arc::new(Schema::new(vec![
    Field::new("id", DataType::Utf8, false),
    Field::new("document", DataType::Utf8, false),
    Field::new("post_id", DataType::Utf8, false),
    Field::new("permalink", DataType::Utf8, false),
    Field::new("media_type", DataType::Utf8, false),
    Field::new("timestamp", DataType::Utf8, false),
    Field::new("like_count", DataType::Int64, false),
    Field::new("comments_count", DataType::Int64, false),
    Field::new("hashtags", DataType::Utf8, false),
    Field::new("ingredients", DataType::Utf8, false),
    Field::new(
      "embedding",
      DataType::FixedSizeList(
        Arc::new(Field::new("item", DataType::Float32, true)),
        dimension as i32,
      ),
      false,
    ),
  ]))
}

/// Convert indexed entries to an Arrow RecordBatch
pub fn entries_to_arrow_batch(entries: &[IndexedEntry], dimension: usize) -> Result<RecordBatch> {
  if entries.is_empty() {
    return Err(anyhow!("Cannot create RecordBatch from zero entries"));
  }

  let schema = posts_schema(dimension);

  let columns: Vec<Arc<dyn Array>> = vec![
    Arc::new(string_column(entries, |e| &e.id)),
    Arc::new(string_column(entries, |e| &e.document)),
    Arc::new(string_column(entries, |e| &e.metadata.post_id)),
    Arc::new(string_column(entries, |e| &e.metadata.permalink)),
    Arc::new(string_column(entries, |e| &e.metadata.media_type)),
    Arc::new(string_column(entries, |e| &e.metadata.timestamp)),
    Arc::new(int_column(entries, |e| e.metadata.like_count)),
    Arc::new(int_column(entries, |e| e.metadata.comments_count)),
    Arc::new(string_column(entries, |e| &e.metadata.hashtags)),
    Arc::new(string_column(entries, |e| &e.metadata.ingredients)),
    Arc::new(embedding_column(entries, dimension)),
  ];

  RecordBatch::try_new(schema, columns).map_err(|e| anyhow!("Failed to create RecordBatch: {}", e))
}

fn string_column<F>(entries: &[IndexedEntry], field: F) -> StringArray
where
  F: Fn(&IndexedEntry) -> &str,
{
  let values: Vec<Option<&str>> = entries.iter().map(|e| Some(field(e))).collect();
  StringArray::from(values)
}

fn int_column<F>(entries: &[IndexedEntry], field: F) -> Int64Array
where
  F: Fn(&IndexedEntry) -> u32,
{
  let values: Vec<i64> = entries.iter().map(|e| i64::from(field(e))).collect();
  Int64Array::from(values)
}

fn embedding_column(
  entries: &[IndexedEntry],
  dimension: usize,
) -> arrow::array::FixedSizeListArray {
  let mut builder = FixedSizeListBuilder::new(
    Float32Array::builder(dimension * entries.len()),
    dimension as i32,
  );

  for entry in entries {
    for &value in &entry.embedding {
      builder.values().append_value(value);
    }
    builder.append(true);
  }

  builder.finish()
}
