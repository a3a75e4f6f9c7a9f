//! Integration tests for `dav-publish list` and `dav-publish prune`

use crate::helpers::*;
use anyhow::Result;

const REMOTE: [&str; 5] = [
  "App_v1.0.2.exe",
  "App_v1.0.10.exe",
  "App_v1.0.9.exe",
  "App_v0.9.0.exe",
  "update.json",
];

#[test]
fn test_list_json_is_newest_first() -> Result<()> {
  let dav = FakeDav::start(&REMOTE)?;
  let project = TestProject::new(&dav.url(), 2)?;

  let output = run_ok(&project.path, &["list", "--json"])?;
  let entries: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  let entries = entries.as_array().unwrap();

  let versions: Vec<_> = entries.iter().map(|e| e["version"].as_str().unwrap()).collect();
  assert_eq!(versions, vec!["1.0.10", "1.0.9", "1.0.2", "0.9.0"]);
  let retained: Vec<_> = entries.iter().map(|e| e["retained"].as_bool().unwrap()).collect();
  assert_eq!(retained, vec![true, true, false, false]);
  dav.with_state(|state| assert_eq!(state.requests, vec!["PROPFIND "]));
  Ok(())
}

#[test]
fn test_prune_remote_dry_run_deletes_nothing() -> Result<()> {
  let dav = FakeDav::start(&REMOTE)?;
  let project = TestProject::new(&dav.url(), 2)?;

  let output = run_ok(&project.path, &["prune", "--remote", "--dry-run"])?;

  assert!(stdout(&output).contains("would delete App_v1.0.2.exe"));
  dav.with_state(|state| assert!(state.requests_with("DELETE").is_empty()));
  Ok(())
}

#[test]
fn test_prune_remote_deletes_oldest() -> Result<()> {
  let dav = FakeDav::start(&REMOTE)?;
  let project = TestProject::new(&dav.url(), 2)?;

  run_ok(&project.path, &["prune", "--remote"])?;

  dav.with_state(|state| {
    assert_eq!(state.requests_with("DELETE"), vec!["App_v1.0.2.exe", "App_v0.9.0.exe"]);
    assert_eq!(state.names(), vec!["App_v1.0.10.exe", "App_v1.0.9.exe", "update.json"]);
  });
  Ok(())
}

#[test]
fn test_prune_local_only() -> Result<()> {
  let dav = FakeDav::start(&REMOTE)?;
  let project = TestProject::new(&dav.url(), 2)?;
  for patch in 1..=4 {
    project.write(&format!("dist/App_v1.0.{}.exe", patch), "x")?;
  }
  project.write("dist/App.spec", "x")?;

  run_ok(&project.path, &["prune", "--local"])?;

  assert!(project.path.join("dist/App_v1.0.4.exe").exists());
  assert!(project.path.join("dist/App_v1.0.3.exe").exists());
  assert!(!project.path.join("dist/App_v1.0.2.exe").exists());
  assert!(!project.path.join("dist/App_v1.0.1.exe").exists());
  assert!(project.path.join("dist/App.spec").exists());
  dav.with_state(|state| assert!(state.requests.is_empty()));
  Ok(())
}

#[test]
fn test_failed_listing_exits_with_system_error() -> Result<()> {
  let dav = FakeDav::start(&REMOTE)?;
  dav.with_state(|state| state.reject_propfind = Some(500));
  let project = TestProject::new(&dav.url(), 2)?;

  let output = run_dav_publish(&project.path, &["prune", "--remote"])?;

  assert_eq!(output.status.code(), Some(2));
  assert!(stderr(&output).contains("HTTP 500"));
  Ok(())
}

#[test]
fn test_wrong_credentials_get_help() -> Result<()> {
  let dav = FakeDav::start(&REMOTE)?;
  let project = TestProject::new(&dav.url(), 2)?;
  project.set_config_line("password", r#"password = "wrong""#)?;

  let output = run_dav_publish(&project.path, &["list"])?;

  assert_eq!(output.status.code(), Some(2));
  let err = stderr(&output);
  assert!(err.contains("HTTP 401"));
  assert!(err.contains("password"));
  Ok(())
}

#[test]
fn test_prune_remote_leaves_versioned_collections_alone() -> Result<()> {
  let dav = FakeDav::start(&["App_v0.0.1.exe/", "App_v1.0.2.exe", "App_v1.0.3.exe"])?;
  let project = TestProject::new(&dav.url(), 1)?;

  let output = run_ok(&project.path, &["prune", "--remote"])?;

  assert!(!stdout(&output).contains("App_v0.0.1.exe"));
  dav.with_state(|state| {
    assert_eq!(state.requests_with("DELETE"), vec!["App_v1.0.2.exe"]);
    assert!(state.files.contains_key("App_v0.0.1.exe/"));
  });
  Ok(())
}
