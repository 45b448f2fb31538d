//! Text composition: the embedding-input string and its display helpers
//!
//! The composed string is both what gets embedded and what gets echoed
//! back as a result's display text, so every match is traceable to
//! exactly the text that was scored against it.

use chrono::DateTime;

use crate::record::Record;

/// Marker separating the recipe title from the rest of the caption
pub const TITLE_MARKER: &str = " - Another Day In Paradise";

/// Title used when a document carries no recognizable marker
pub const FALLBACK_TITLE: &str = "Recipe";

/// Display bound for result document text, in characters
pub const DOCUMENT_DISPLAY_LIMIT: usize = 300;

const ELLIPSIS: &str = "...";

/// Compose the embedding-input string for a record
///
/// Deterministic: the same record always yields the same string. Empty
/// hashtag or ingredient lists render as their empty joins rather than
/// being skipped.
pub fn embedding_text(record: &Record) -> String {
  let tags =
    record.hashtags.iter().map(|tag| format!("#{tag}")).collect::<Vec<_>>().join(" ");
  let ingredients = record.ingredients.join(", ");

  format!("{} {} Ingredients: {}", record.caption, tags, ingredients)
}

/// Extract a human-readable title from a composed document
///
/// Takes the text preceding the title marker on the opening line;
/// documents whose first line lacks the marker get the generic
/// fallback, even when the marker appears further down the caption.
pub fn extract_title(document: &str) -> String {
  let first_line = document.lines().next().unwrap_or("");
  match first_line.find(TITLE_MARKER) {
    Some(pos) => first_line[..pos].to_string(),
    None => FALLBACK_TITLE.to_string(),
  }
}

/// Truncate document text to the display bound
///
/// Text at or under the bound comes back unmodified with no marker.
/// The cut lands on a char boundary so multi-byte captions stay valid.
pub fn truncate_document(document: &str) -> String {
  truncate_to(document, DOCUMENT_DISPLAY_LIMIT)
}

fn truncate_to(text: &str, limit: usize) -> String {
  if text.chars().count() <= limit {
    return text.to_string();
  }

  let truncated: String = text.chars().take(limit).collect();
  format!("{truncated}{ELLIPSIS}")
}

/// Join list-valued metadata into the delimited scalar form the index stores
pub fn join_tags(tags: &[String]) -> String {
  tags.join(",")
}

/// Split a delimited metadata string back into its sequence form
///
/// The empty string round-trips to an empty sequence, not `[""]`.
pub fn split_tags(joined: &str) -> Vec<String> {
  if joined.is_empty() {
    return Vec::new();
  }
  joined.split(',').map(|tag| tag.trim().to_string()).collect()
}

/// Format an ISO-8601 timestamp as a readable date
///
/// Unparseable or empty timestamps degrade to the raw string; a bad
/// date on one record never fails a whole result.
pub fn format_date(timestamp: &str) -> String {
  if timestamp.is_empty() {
    return String::new();
  }

  match DateTime::parse_from_rfc3339(timestamp) {
    Ok(date) => date.format("%b %d, %Y").to_string(),
    Err(_) => timestamp.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_record() -> Record {
    Record {
      id: "1001".to_string(),
      caption: "Pork Belly Rice".to_string(),
      media_type: "IMAGE".to_string(),
      permalink: "https://instagram.com/p/mock1001".to_string(),
      timestamp: "2025-03-14T12:00:00+00:00".to_string(),
      like_count: 120,
      comments_count: 8,
      hashtags: vec!["porkbelly".to_string(), "rice".to_string()],
      ingredients: vec!["pork belly".to_string(), "sushi rice".to_string()],
    }
  }

  #[test]
  fn embedding_text_is_deterministic() {
    let record = sample_record();
    assert_eq!(embedding_text(&record), embedding_text(&record));
    assert_eq!(
      embedding_text(&record),
      "Pork Belly Rice #porkbelly #rice Ingredients: pork belly, sushi rice"
    );
  }

  #[test]
  fn embedding_text_handles_empty_lists() {
    let mut record = sample_record();
    record.hashtags.clear();
    record.ingredients.clear();
    assert_eq!(embedding_text(&record), "Pork Belly Rice  Ingredients: ");
  }

  #[test]
  fn title_extraction_uses_marker() {
    let document = format!("Carrot Salad{TITLE_MARKER}\nA classic.");
    assert_eq!(extract_title(&document), "Carrot Salad");
    assert_eq!(extract_title("no marker here"), FALLBACK_TITLE);
  }

  #[test]
  fn title_marker_past_the_first_line_is_ignored() {
    let document = format!("Carrot Salad\nAs seen on{TITLE_MARKER}, episode 3.");
    assert_eq!(extract_title(&document), FALLBACK_TITLE);
  }

  #[test]
  fn truncation_is_bounded_and_char_safe() {
    let short = "short caption";
    assert_eq!(truncate_document(short), short);

    let long = "é".repeat(DOCUMENT_DISPLAY_LIMIT + 50);
    let truncated = truncate_document(&long);
    assert!(truncated.ends_with("..."));
    assert_eq!(truncated.chars().count(), DOCUMENT_DISPLAY_LIMIT + 3);
  }

  #[test]
  fn tags_round_trip_through_delimited_form() {
    let tags = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    assert_eq!(join_tags(&tags), "a,b,c");
    assert_eq!(split_tags("a,b,c"), tags);
    assert!(split_tags("").is_empty());
  }

  #[test]
  fn date_formatting_degrades_to_raw_string() {
    assert_eq!(format_date("2025-03-14T12:00:00+00:00"), "Mar 14, 2025");
    assert_eq!(format_date("not-a-date"), "not-a-date");
    assert_eq!(format_date(""), "");
  }
}
