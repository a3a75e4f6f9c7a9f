//! Integration tests for configuration discovery and validation

use crate::helpers::*;
use anyhow::Result;
use tempfile::TempDir;

#[test]
fn test_missing_config_is_reported() -> Result<()> {
  let dir = TempDir::new()?;

  let output = run_dav_publish(dir.path(), &["version"])?;

  assert_eq!(output.status.code(), Some(1));
  let err = stderr(&output);
  assert!(err.contains("publish.toml"));
  assert!(err.contains("Help:"));
  Ok(())
}

#[test]
fn test_explicit_config_path() -> Result<()> {
  let project = TestProject::new("http://127.0.0.1:9/dav", 5)?;
  std::fs::create_dir_all(project.path.join("conf"))?;
  std::fs::rename(project.path.join("publish.toml"), project.path.join("conf/release.toml"))?;

  let output = run_ok(&project.path, &["--config", "conf/release.toml", "version"])?;
  assert!(stdout(&output).contains("1.0.1"));
  Ok(())
}

#[test]
fn test_dotted_config_location() -> Result<()> {
  let project = TestProject::new("http://127.0.0.1:9/dav", 5)?;
  std::fs::create_dir_all(project.path.join(".config"))?;
  std::fs::rename(project.path.join("publish.toml"), project.path.join(".config/publish.toml"))?;

  run_ok(&project.path, &["version"])?;
  Ok(())
}

#[test]
fn test_invalid_retention_is_rejected() -> Result<()> {
  let project = TestProject::new("http://127.0.0.1:9/dav", 0)?;

  let output = run_dav_publish(&project.path, &["version"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("keep"));
  Ok(())
}

#[test]
fn test_release_without_config_exits_without_waiting() -> Result<()> {
  let dir = TempDir::new()?;

  let output = run_dav_publish(dir.path(), &["release"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("publish.toml"));
  assert!(!stdout(&output).contains("Press Enter"));
  Ok(())
}
