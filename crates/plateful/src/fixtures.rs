//! Mock fixture generation: sample recipe posts in JSON and CSV form

use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use rand::Rng;
use std::path::Path;

use crate::record::{CsvRecord, Record};

/// Generate the sample posts with randomized dates and engagement counts
pub fn mock_posts() -> Vec<Record> {
  let mut rng = rand::rng();

  sample_posts()
    .into_iter()
    .map(|mut record| {
      record.timestamp = random_date(&mut rng);
      record.like_count = rng.random_range(500..=3000);
      record.comments_count = rng.random_range(20..=150);
      record
    })
    .collect()
}

/// A random RFC-3339 timestamp within the past year
fn random_date(rng: &mut impl Rng) -> String {
  let days_back = rng.random_range(1..=365);
  (Utc::now() - Duration::days(days_back)).to_rfc3339()
}

/// Write the posts as both fixture forms
///
/// The JSON form keeps nested lists; the CSV form flattens them to
/// comma-delimited strings.
pub fn write_fixtures(data_dir: &Path, posts: &[Record]) -> Result<()> {
  std::fs::create_dir_all(data_dir)
    .map_err(|e| anyhow!("Failed to create data directory: {}", e))?;

  let json_path = data_dir.join("instagram_posts.json");
  let json = serde_json::to_string_pretty(posts)?;
  std::fs::write(&json_path, json)
    .map_err(|e| anyhow!("Failed to write '{}': {}", json_path.display(), e))?;

  let csv_path = data_dir.join("instagram_posts.csv");
  let mut writer = csv::Writer::from_path(&csv_path)
    .map_err(|e| anyhow!("Failed to write '{}': {}", csv_path.display(), e))?;
  for post in posts {
    writer.serialize(CsvRecord::from(post.clone()))?;
  }
  writer.flush()?;

  Ok(())
}

fn sample_posts() -> Vec<Record> {
  vec![
    Record {
      id: "1001".to_string(),
      caption: "Smokey Breaded Aubergine with Tomato and Burrata - Another Day In Paradise\n\
        This is basically an aubergine/eggplant parmesan - a classic I have love for but \
        don't really get down with these days. I usually want it to taste more like \
        aubergine, with a bit of crunch, and have something bright and acidic to cut \
        through it beyond the tomato sauce."
        .to_string(),
      media_type: "CAROUSEL_ALBUM".to_string(),
      permalink: "https://instagram.com/p/mock1001".to_string(),
      timestamp: String::new(),
      like_count: 0,
      comments_count: 0,
      hashtags: to_strings(&["aubergine", "eggplant", "burrata", "recipe", "vegetarian"]),
      ingredients: to_strings(&[
        "aubergine",
        "flour",
        "breadcrumbs",
        "egg",
        "milk",
        "tomatoes",
        "shallot",
        "garlic",
        "basil",
        "burrata",
      ]),
    },
    Record {
      id: "1002".to_string(),
      caption: "Spicy Carottes Râpées, and Chicken With Pan Sauce - Another Day In Paradise\n\
        I love the classic French shredded carrot salad, and highly recommend you have it \
        in your back pocket if you don't already. This version is not the classic, but \
        still hits a lot of the same notes."
        .to_string(),
      media_type: "IMAGE".to_string(),
      permalink: "https://instagram.com/p/mock1002".to_string(),
      timestamp: String::new(),
      like_count: 0,
      comments_count: 0,
      hashtags: to_strings(&["french", "carrots", "chicken", "recipe", "pansauce"]),
      ingredients: to_strings(&["carrots", "chicken", "herbs", "vinegar"]),
    },
    Record {
      id: "1003".to_string(),
      caption: "Pork Belly Rice - Another Day In Paradise\n\
        I've been throwing stuff in my rice cooker to see what happens since I've had one \
        - this combo is my favourite so far. Always with something fresh and pickled near \
        by."
        .to_string(),
      media_type: "CAROUSEL_ALBUM".to_string(),
      permalink: "https://instagram.com/p/mock1004".to_string(),
      timestamp: String::new(),
      like_count: 0,
      comments_count: 0,
      hashtags: to_strings(&["porkbelly", "rice", "ricecooker", "asian"]),
      ingredients: to_strings(&[
        "pork belly",
        "sushi rice",
        "ginger",
        "garlic",
        "soy sauce",
        "sesame oil",
      ]),
    },
  ]
}

fn to_strings(values: &[&str]) -> Vec<String> {
  values.iter().map(|s| s.to_string()).collect()
}
