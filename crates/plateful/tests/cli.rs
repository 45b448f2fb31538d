use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use serial_test::serial;
use std::process::Command;

/// Helper to create a Command for the `plateful` binary rooted at a temp dir
fn plateful_cmd(root: &assert_fs::TempDir) -> Command {
  let mut cmd = Command::cargo_bin("plateful").expect("binary exists");
  cmd.env("PLATEFUL_ROOT", root.path());
  cmd
}

#[test]
#[serial]
fn mock_data_creates_both_fixture_files() {
  let temp = assert_fs::TempDir::new().unwrap();

  plateful_cmd(&temp)
    .args(["mock-data"])
    .assert()
    .success()
    .stdout(contains("Created mock dataset"));

  assert!(temp.path().join("data/instagram_posts.json").exists());
  assert!(temp.path().join("data/instagram_posts.csv").exists());

  temp.close().unwrap();
}

#[test]
#[serial]
fn index_without_data_names_the_mock_data_step() {
  let temp = assert_fs::TempDir::new().unwrap();

  plateful_cmd(&temp)
    .args(["index"])
    .assert()
    .failure()
    .stderr(contains("No data found").and(contains("mock-data")));

  temp.close().unwrap();
}

#[test]
#[serial]
fn search_without_an_index_is_a_distinct_user_actionable_error() {
  let temp = assert_fs::TempDir::new().unwrap();

  plateful_cmd(&temp)
    .args(["search", "eggplant dinner"])
    .assert()
    .failure()
    .stderr(contains("no recipe index found").and(contains("plateful index")));

  temp.close().unwrap();
}
