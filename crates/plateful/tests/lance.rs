//! LanceDB adapter tests against a temporary on-disk index
#![cfg(feature = "ml-features")]

use std::sync::Arc;
use tempfile::TempDir;

use plateful::embedding::mock::MockEmbedder;
use plateful::index::lance::LanceIndex;
use plateful::index::{IndexError, SearchFilter, VectorIndex};
use plateful::ingest;
use plateful::record::Record;
use plateful::search::{SearchEngine, SearchError, SearchRequest};

fn make_record(id: &str, caption: &str, media_type: &str, like_count: u32) -> Record {
  Record {
    id: id.to_string(),
    caption: caption.to_string(),
    media_type: media_type.to_string(),
    permalink: format!("https://instagram.com/p/{id}"),
    timestamp: "2025-06-01T09:30:00+00:00".to_string(),
    like_count,
    comments_count: 5,
    hashtags: vec!["recipe".to_string()],
    ingredients: vec!["salt".to_string()],
  }
}

async fn open_index(temp: &TempDir) -> LanceIndex {
  LanceIndex::open(temp.path().join("lance_db"), "instagram_posts").await.unwrap()
}

#[tokio::test]
async fn query_before_any_rebuild_is_missing() {
  let temp = TempDir::new().unwrap();
  let index = open_index(&temp).await;

  let result = index.query(&[0.0; 384], 3, None).await;
  assert!(matches!(result, Err(IndexError::Missing)));
  assert!(matches!(index.count().await, Err(IndexError::Missing)));
}

#[tokio::test]
async fn rebuild_then_query_returns_the_indexed_posts() {
  let temp = TempDir::new().unwrap();
  let index = open_index(&temp).await;
  let embedder = MockEmbedder::new();

  let records = vec![
    make_record("1", "Aubergine Parmesan", "CAROUSEL_ALBUM", 100),
    make_record("2", "Carrot Salad", "IMAGE", 600),
    make_record("3", "Pork Belly Rice", "CAROUSEL_ALBUM", 2600),
  ];
  let count = ingest::rebuild_index(&records, &embedder, &index).await.unwrap();
  assert_eq!(count, 3);
  assert_eq!(index.count().await.unwrap(), 3);

  let engine = SearchEngine::new(Arc::new(embedder), Arc::new(index));
  let mut request = SearchRequest::new("Carrot Salad");
  request.top_k = 1;

  let hits = engine.search(&request).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert!(hits[0].document.contains("Carrot Salad"));
  assert!(hits[0].similarity > 0.0);
}

#[tokio::test]
async fn filters_push_down_before_ranking() {
  let temp = TempDir::new().unwrap();
  let index = open_index(&temp).await;
  let embedder = MockEmbedder::new();

  let records = vec![
    make_record("1", "Aubergine Parmesan", "CAROUSEL_ALBUM", 100),
    make_record("2", "Carrot Salad", "IMAGE", 600),
    make_record("3", "Pork Belly Rice", "CAROUSEL_ALBUM", 2600),
  ];
  ingest::rebuild_index(&records, &embedder, &index).await.unwrap();

  use plateful::embedding::TextEmbedder;
  let query_embedding = embedder.embed("recipe").await.unwrap();

  let filter = SearchFilter { media_type: None, min_likes: Some(500) };
  let hits = index.query(&query_embedding, 10, Some(&filter)).await.unwrap();
  assert_eq!(hits.len(), 2);
  assert!(hits.iter().all(|hit| hit.metadata.like_count >= 500));

  let filter = SearchFilter { media_type: Some("IMAGE".to_string()), min_likes: None };
  let hits = index.query(&query_embedding, 10, Some(&filter)).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].metadata.media_type, "IMAGE");
}

#[tokio::test]
async fn rebuilding_from_zero_records_leaves_a_queryable_empty_index() {
  let temp = TempDir::new().unwrap();
  let index = open_index(&temp).await;

  index.rebuild(Vec::new()).await.unwrap();
  assert_eq!(index.count().await.unwrap(), 0);

  let hits = index.query(&[0.1; 384], 3, None).await.unwrap();
  assert!(hits.is_empty());
}

#[tokio::test]
async fn rebuild_replaces_rather_than_merges() {
  let temp = TempDir::new().unwrap();
  let index = open_index(&temp).await;
  let embedder = MockEmbedder::new();

  let first = vec![
    make_record("1", "Aubergine Parmesan", "IMAGE", 100),
    make_record("2", "Carrot Salad", "IMAGE", 600),
  ];
  ingest::rebuild_index(&first, &embedder, &index).await.unwrap();
  assert_eq!(index.count().await.unwrap(), 2);

  let second = vec![make_record("9", "Pork Belly Rice", "VIDEO", 50)];
  ingest::rebuild_index(&second, &embedder, &index).await.unwrap();
  assert_eq!(index.count().await.unwrap(), 1);

  use plateful::embedding::TextEmbedder;
  let query_embedding = embedder.embed("Pork Belly Rice").await.unwrap();
  let hits = index.query(&query_embedding, 10, None).await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].metadata.post_id, "9");
}

#[tokio::test]
async fn mismatched_entry_dimensions_fail_the_rebuild() {
  let temp = TempDir::new().unwrap();
  let index = open_index(&temp).await;
  let embedder_a = MockEmbedder::with_dimension(8);
  let embedder_b = MockEmbedder::with_dimension(16);

  use plateful::embedding::TextEmbedder;
  use plateful::index::{IndexedEntry, PostMetadata};

  let record = make_record("1", "Carrot Salad", "IMAGE", 10);
  let entries = vec![
    IndexedEntry {
      id: "1".to_string(),
      document: "a".to_string(),
      embedding: embedder_a.embed("a").await.unwrap(),
      metadata: PostMetadata::from_record(&record),
    },
    IndexedEntry {
      id: "2".to_string(),
      document: "b".to_string(),
      embedding: embedder_b.embed("b").await.unwrap(),
      metadata: PostMetadata::from_record(&record),
    },
  ];

  assert!(matches!(index.rebuild(entries).await, Err(IndexError::Rebuild(_))));
}

#[tokio::test]
async fn missing_index_maps_to_the_pipeline_error() {
  let temp = TempDir::new().unwrap();
  let index = open_index(&temp).await;
  let engine = SearchEngine::new(Arc::new(MockEmbedder::new()), Arc::new(index));

  let result = engine.search(&SearchRequest::new("anything")).await;
  assert!(matches!(result, Err(SearchError::MissingIndex)));
}
