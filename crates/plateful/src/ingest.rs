//! Build-time pipeline: records -> composed documents -> embeddings -> index

use anyhow::Result;

use crate::compose;
use crate::embedding::TextEmbedder;
use crate::index::{IndexedEntry, PostMetadata, VectorIndex};
use crate::record::Record;

/// Embed every record and rebuild the index from scratch
///
/// Returns the number of entries indexed. The rebuild replaces the
/// whole index; there is no incremental path.
pub async fn rebuild_index(
  records: &[Record],
  embedder: &dyn TextEmbedder,
  index: &dyn VectorIndex,
) -> Result<usize> {
  let documents: Vec<String> = records.iter().map(compose::embedding_text).collect();

  tracing::info!(records = records.len(), "generating embeddings");
  let embeddings = embedder.embed_batch(&documents).await?;

  let entries: Vec<IndexedEntry> = records
    .iter()
    .zip(documents)
    .zip(embeddings)
    .map(|((record, document), embedding)| IndexedEntry {
      id: record.id.clone(),
      document,
      embedding,
      metadata: PostMetadata::from_record(record),
    })
    .collect();

  let count = entries.len();
  index.rebuild(entries).await?;

  Ok(count)
}
