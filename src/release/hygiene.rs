//! Pre-packaging cache cleanup
//!
//! Purges the contents of each configured cache directory (the directory
//! itself stays) and deletes stale compiled files under the project root.
//! Individual removal failures are collected and skipped.

use crate::core::error::{PublishError, PublishResult, ResultExt};
use crate::ui::progress::FileProgress;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct CleanupReport {
  /// Cache directories that existed and were purged
  pub purged_dirs: Vec<PathBuf>,
  /// Stale files removed from the project tree
  pub stale_removed: usize,
  /// Entries that could not be removed, with the reason
  pub failures: Vec<(PathBuf, String)>,
}

impl CleanupReport {
  pub fn cleaned_anything(&self) -> bool {
    !self.purged_dirs.is_empty() || self.stale_removed > 0
  }
}

/// Delete everything inside `dir`, keeping `dir` itself
pub fn purge_dir_contents(dir: &Path, report: &mut CleanupReport) -> PublishResult<()> {
  let entries: Vec<PathBuf> = fs::read_dir(dir)
    .with_context(|| format!("Failed to read {}", dir.display()))?
    .filter_map(Result::ok)
    .map(|entry| entry.path())
    .collect();

  let mut progress = (!entries.is_empty()).then(|| FileProgress::new(entries.len(), "cache entries"));
  for path in entries {
    let result = if path.is_dir() && !path.is_symlink() {
      fs::remove_dir_all(&path)
    } else {
      fs::remove_file(&path)
    };
    if let Err(e) = result {
      report.failures.push((path, e.to_string()));
    }
    if let Some(bar) = progress.as_mut() {
      bar.inc();
    }
  }
  report.purged_dirs.push(dir.to_path_buf());
  Ok(())
}

/// Remove files with any of `extensions` anywhere under `root`
pub fn remove_stale_files(root: &Path, extensions: &[String], report: &mut CleanupReport) -> PublishResult<()> {
  if extensions.is_empty() {
    return Ok(());
  }
  fs::read_dir(root).with_context(|| format!("Failed to read {}", root.display()))?;

  let mut stale = Vec::new();
  for ext in extensions {
    let pattern = format!(
      "{}/**/*.{}",
      glob::Pattern::escape(&root.to_string_lossy()),
      glob::Pattern::escape(ext.trim_start_matches('.'))
    );
    let paths = glob::glob(&pattern).map_err(|e| PublishError::message(e.to_string()))?;
    stale.extend(paths.filter_map(Result::ok).filter(|p| p.is_file()));
  }

  if stale.is_empty() {
    return Ok(());
  }

  println!("  - Removing {} stale build file(s)", stale.len());
  let mut progress = FileProgress::new(stale.len(), "stale files");
  for path in stale {
    match fs::remove_file(&path) {
      Ok(()) => report.stale_removed += 1,
      Err(e) => report.failures.push((path, e.to_string())),
    }
    progress.inc();
  }
  Ok(())
}

/// Purge every existing cache directory, then stale files under `root`
///
/// Fails only when the project root itself cannot be scanned.
pub fn clean_before_packaging(
  root: &Path,
  cache_dirs: &[PathBuf],
  stale_extensions: &[String],
) -> PublishResult<CleanupReport> {
  let mut report = CleanupReport::default();

  for dir in cache_dirs.iter().filter(|d| d.is_dir()) {
    println!("  - Purging cache directory: {}", dir.display());
    if let Err(e) = purge_dir_contents(dir, &mut report) {
      report.failures.push((dir.clone(), e.to_string()));
    }
  }

  remove_stale_files(root, stale_extensions, &mut report)?;
  Ok(report)
}
