//! Fixture generation and record loading round trips

use tempfile::TempDir;

use plateful::fixtures;
use plateful::record;

#[test]
fn fixtures_write_both_forms() {
  let temp = TempDir::new().unwrap();
  let posts = fixtures::mock_posts();

  fixtures::write_fixtures(temp.path(), &posts).unwrap();

  assert!(temp.path().join("instagram_posts.json").exists());
  assert!(temp.path().join("instagram_posts.csv").exists());
}

#[test]
fn csv_round_trip_restores_list_fields() {
  let temp = TempDir::new().unwrap();
  let posts = fixtures::mock_posts();
  fixtures::write_fixtures(temp.path(), &posts).unwrap();

  let loaded = record::load_csv(&temp.path().join("instagram_posts.csv")).unwrap();

  assert_eq!(loaded.len(), posts.len());
  for (original, read_back) in posts.iter().zip(&loaded) {
    assert_eq!(read_back.id, original.id);
    assert_eq!(read_back.caption, original.caption);
    assert_eq!(read_back.hashtags, original.hashtags);
    assert_eq!(read_back.ingredients, original.ingredients);
    assert_eq!(read_back.like_count, original.like_count);
  }
}

#[test]
fn json_form_keeps_nested_lists() {
  let temp = TempDir::new().unwrap();
  let posts = fixtures::mock_posts();
  fixtures::write_fixtures(temp.path(), &posts).unwrap();

  let loaded = record::load_json(&temp.path().join("instagram_posts.json")).unwrap();

  assert_eq!(loaded.len(), posts.len());
  assert_eq!(loaded[0].hashtags, posts[0].hashtags);
}

#[test]
fn mock_posts_carry_randomized_engagement() {
  for post in fixtures::mock_posts() {
    assert!((500..=3000).contains(&post.like_count));
    assert!((20..=150).contains(&post.comments_count));
    assert!(!post.timestamp.is_empty());
  }
}

#[test]
fn loading_a_missing_file_is_an_error() {
  let temp = TempDir::new().unwrap();
  assert!(record::load_csv(&temp.path().join("nope.csv")).is_err());
  assert!(record::load_json(&temp.path().join("nope.json")).is_err());
}
