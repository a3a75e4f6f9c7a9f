//! Integration tests for `dav-publish version`

use crate::helpers::*;
use anyhow::Result;

const UNUSED_REMOTE: &str = "http://127.0.0.1:9/dav";

#[test]
fn test_version_without_state() -> Result<()> {
  let project = TestProject::new(UNUSED_REMOTE, 5)?;

  let output = run_ok(&project.path, &["version"])?;

  assert!(stdout(&output).contains("first release will be 1.0.1"));
  assert!(!project.path.join("version.txt").exists());
  Ok(())
}

#[test]
fn test_bump_follows_seed_then_increments() -> Result<()> {
  let project = TestProject::new(UNUSED_REMOTE, 5)?;

  let first = run_ok(&project.path, &["version", "--bump"])?;
  assert!(stdout(&first).contains("1.0.1"));
  assert_eq!(project.read("version.txt")?.trim(), "1.0.0");

  let second = run_ok(&project.path, &["version", "--bump"])?;
  assert!(stdout(&second).contains("1.0.1"));
  assert_eq!(project.read("version.txt")?.trim(), "1.0.1");

  let third = run_ok(&project.path, &["version", "--bump"])?;
  assert!(stdout(&third).contains("1.0.2"));

  let shown = run_ok(&project.path, &["version"])?;
  assert_eq!(stdout(&shown).trim(), "1.0.2");
  Ok(())
}

#[test]
fn test_unparsable_state_is_a_user_error() -> Result<()> {
  let project = TestProject::new(UNUSED_REMOTE, 5)?;
  project.write("version.txt", "1.0")?;

  let output = run_dav_publish(&project.path, &["version", "--bump"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Help:"));
  assert_eq!(project.read("version.txt")?, "1.0");
  Ok(())
}
