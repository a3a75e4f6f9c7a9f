//! Integration tests for `dav-publish release`

use crate::helpers::*;
use anyhow::Result;

const PREVIOUS: [&str; 7] = [
  "App_v1.0.0.exe",
  "App_v1.0.1.exe",
  "App_v1.0.2.exe",
  "App_v1.0.3.exe",
  "App_v1.0.4.exe",
  "App_v1.0.5.exe",
  "readme.txt",
];

#[test]
fn test_release_publishes_and_applies_retention() -> Result<()> {
  let dav = FakeDav::start(&PREVIOUS)?;
  let project = TestProject::new(&dav.url(), 5)?;
  project.write("version.txt", "1.0.5")?;
  project.write("cache/fonts/glyphs.bin", "x")?;
  project.write("__pycache__/app.cpython-311.pyc", "x")?;

  let output = run_ok(&project.path, &["release", "--yes"])?;
  let out = stdout(&output);

  assert!(out.contains("Release 1.0.6 completed"), "stdout: {}", out);
  assert!(out.contains("https://dl.example.org/app/App_v1.0.6.exe"));

  assert_eq!(project.read("version.txt")?.trim(), "1.0.6");
  let source = project.read("app.py")?;
  assert!(source.contains(r#"self.current_version = "1.0.6""#));
  assert!(source.contains("update.json?v=1.0.6\""));

  let manifest: serde_json::Value = serde_json::from_str(&project.read("update.json")?)?;
  assert_eq!(manifest["version"], "1.0.6");
  assert_eq!(manifest["download_url"], "https://dl.example.org/app/App_v1.0.6.exe");

  assert!(project.path.join("desktop/App_v1.0.6.exe").exists());
  assert!(project.path.join("cache").is_dir());
  assert!(!project.path.join("cache/fonts").exists());
  assert!(!project.path.join("__pycache__/app.cpython-311.pyc").exists());

  dav.with_state(|state| {
    assert_eq!(state.requests_with("PUT"), vec!["App_v1.0.6.exe", "update.json"]);
    assert_eq!(state.requests_with("DELETE"), vec!["App_v1.0.1.exe", "App_v1.0.0.exe"]);

    let (bytes, content_type) = &state.files["App_v1.0.6.exe"];
    assert_eq!(bytes.as_slice(), b"MZ1.0.6");
    assert_eq!(content_type, "application/octet-stream");
    assert_eq!(state.files["update.json"].1, "application/json");

    assert!(state.files.contains_key("readme.txt"));
    let versioned = state.names().iter().filter(|n| n.starts_with("App_v")).count();
    assert_eq!(versioned, 5);
  });

  Ok(())
}

#[test]
fn test_first_release_starts_at_1_0_1() -> Result<()> {
  let dav = FakeDav::start(&[])?;
  let project = TestProject::new(&dav.url(), 5)?;

  run_ok(&project.path, &["release", "--yes"])?;

  assert_eq!(project.read("version.txt")?.trim(), "1.0.0");
  assert!(project.read("app.py")?.contains(r#""1.0.1""#));
  dav.with_state(|state| assert!(state.files.contains_key("App_v1.0.1.exe")));
  Ok(())
}

#[test]
fn test_rejected_upload_completes_with_warning() -> Result<()> {
  let dav = FakeDav::start(&PREVIOUS)?;
  dav.with_state(|state| state.reject_put = Some(507));
  let project = TestProject::new(&dav.url(), 5)?;
  project.write("version.txt", "1.0.5")?;

  let output = run_dav_publish(&project.path, &["release", "--yes"])?;
  let out = stdout(&output);

  assert!(output.status.success(), "stderr: {}", stderr(&output));
  assert!(out.contains("completed with warnings"), "stdout: {}", out);
  assert!(out.contains("manually"));
  assert!(project.path.join("dist/App_v1.0.6.exe").exists());
  dav.with_state(|state| {
    assert!(state.requests_with("DELETE").is_empty());
    assert!(state.requests_with("PROPFIND").is_empty());
  });
  Ok(())
}

#[test]
fn test_failed_source_check_halts_with_diagnostic() -> Result<()> {
  let dav = FakeDav::start(&[])?;
  let project = TestProject::new(&dav.url(), 5)?;
  project.write("version.txt", "1.0.5")?;
  project.set_config_line(
    "validate",
    r#"validate = ["sh", "-c", "echo 'SyntaxError: invalid syntax' >&2; exit 1"]"#,
  )?;

  let output = run_dav_publish(&project.path, &["release", "--yes"])?;

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("SyntaxError: invalid syntax"));
  assert!(!project.path.join("dist").exists());
  dav.with_state(|state| assert!(state.requests.is_empty()));
  Ok(())
}

#[test]
fn test_failed_packager_halts() -> Result<()> {
  let dav = FakeDav::start(&[])?;
  let project = TestProject::new(&dav.url(), 5)?;
  project.set_config_line("package", r#"package = ["sh", "-c", "echo 'build broke' >&2; exit 1"]"#)?;

  let output = run_dav_publish(&project.path, &["release", "--yes"])?;

  assert_eq!(output.status.code(), Some(2));
  assert!(stderr(&output).contains("build broke"));
  dav.with_state(|state| assert!(state.requests.is_empty()));
  Ok(())
}

#[test]
fn test_unparsable_version_cancels_without_operator() -> Result<()> {
  let dav = FakeDav::start(&[])?;
  let project = TestProject::new(&dav.url(), 5)?;
  project.write("version.txt", "not a version")?;

  let output = run_dav_publish(&project.path, &["release", "--yes"])?;

  assert!(output.status.success());
  assert!(stdout(&output).contains("Operation cancelled"));
  assert_eq!(project.read("app.py")?, SOURCE);
  Ok(())
}

#[test]
fn test_skip_upload_builds_locally_only() -> Result<()> {
  let dav = FakeDav::start(&PREVIOUS)?;
  let project = TestProject::new(&dav.url(), 5)?;
  project.write("version.txt", "2.3.9")?;

  let output = run_ok(&project.path, &["release", "--yes", "--skip-upload"])?;

  assert!(stdout(&output).contains("skipped"));
  assert!(project.path.join("dist/App_v2.3.10.exe").exists());
  dav.with_state(|state| assert!(state.requests.is_empty()));
  Ok(())
}
