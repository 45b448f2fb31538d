//! Filesystem layout for fixture data and the vector index

use anyhow::Result;
use std::env;
use std::path::PathBuf;

/// Environment variable overriding the application root (used by tests)
pub const ROOT_ENV_VAR: &str = "PLATEFUL_ROOT";

/// Name of the LanceDB table holding indexed posts
pub const TABLE_NAME: &str = "instagram_posts";

/// Resolve the application root directory
///
/// Defaults to the current working directory so the data and index
/// directories sit next to the binary's invocation, like the original
/// demo layout. `PLATEFUL_ROOT` overrides it.
pub fn app_root() -> Result<PathBuf> {
  if let Ok(root) = env::var(ROOT_ENV_VAR) {
    return Ok(PathBuf::from(root));
  }
  Ok(env::current_dir()?)
}

/// Directory holding the generated fixture files
pub fn data_dir() -> Result<PathBuf> {
  Ok(app_root()?.join("data"))
}

/// Path of the tabular (CSV) fixture file
pub fn posts_csv_path() -> Result<PathBuf> {
  Ok(data_dir()?.join("instagram_posts.csv"))
}

/// Path of the structured (JSON) fixture file
pub fn posts_json_path() -> Result<PathBuf> {
  Ok(data_dir()?.join("instagram_posts.json"))
}

/// Directory holding the vector index's on-disk representation
pub fn index_dir() -> Result<PathBuf> {
  Ok(app_root()?.join("lance_db"))
}
