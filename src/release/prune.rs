//! Retention applied to the remote store and the local dist directory
//!
//! The decision comes from [`RetentionPolicy`]; this module only executes it.
//! Deletions are independent: one failure is recorded and the sweep goes on.

use crate::core::error::{PublishError, PublishResult, TransferError};
use crate::release::artifact::ArtifactNaming;
use crate::release::retention::{RetentionDecision, RetentionPolicy};
use crate::remote::RemoteStore;
use std::fs;
use std::path::Path;

/// What a retention sweep decided and what it managed to delete
#[derive(Debug, Default)]
pub struct PruneReport {
  pub decision: RetentionDecision,
  pub deleted: Vec<String>,
  pub failed: Vec<(String, String)>,
  pub dry_run: bool,
}

impl PruneReport {
  /// Print kept and deleted names the way every command reports retention
  pub fn print(&self, target: &str) {
    let total = self.decision.total();
    if total == 0 {
      println!("  ℹ️  No versioned files found on {}", target);
      return;
    }
    println!("  Found {} versioned file(s) on {}", total, target);
    for entry in &self.decision.keep {
      println!("    ✓ keep   {}", entry.label);
    }
    if self.decision.delete.is_empty() {
      println!("  ✅ Nothing to delete");
      return;
    }
    for entry in &self.decision.delete {
      if self.dry_run {
        println!("    - would delete {}", entry.label);
      } else if self.deleted.contains(&entry.label) {
        println!("    ✗ delete {} ✅", entry.label);
      } else if let Some((_, reason)) = self.failed.iter().find(|(name, _)| *name == entry.label) {
        println!("    ✗ delete {} ❌ {}", entry.label, reason);
      }
    }
  }
}

/// Keep the newest versions on the remote store and delete the rest
///
/// A listing failure aborts the sweep. Individual delete failures do not.
pub fn prune_remote(
  store: &dyn RemoteStore,
  naming: &ArtifactNaming,
  policy: RetentionPolicy,
  dry_run: bool,
) -> Result<PruneReport, TransferError> {
  let decision = policy.decide(store.list(naming)?);
  let mut report = PruneReport {
    dry_run,
    ..PruneReport::default()
  };

  if !dry_run {
    for entry in &decision.delete {
      match store.delete(&entry.label) {
        Ok(()) => report.deleted.push(entry.label.clone()),
        Err(e) => {
          log::warn!("remote delete of {} failed: {}", entry.label, e);
          report.failed.push((entry.label.clone(), e.to_string()));
        }
      }
    }
  }

  report.decision = decision;
  Ok(report)
}

/// Same policy over the immediate children of `dist_dir`
pub fn prune_local(
  dist_dir: &Path,
  naming: &ArtifactNaming,
  policy: RetentionPolicy,
  dry_run: bool,
) -> PublishResult<PruneReport> {
  if !dist_dir.is_dir() {
    return Err(PublishError::with_help(
      format!("Output directory not found: {}", dist_dir.display()),
      "Run a release first or check [paths].dist_dir in publish.toml",
    ));
  }

  let names: Vec<String> = fs::read_dir(dist_dir)?
    .filter_map(Result::ok)
    .filter(|entry| entry.path().is_file())
    .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
    .collect();

  let decision = policy.decide_names(naming, names);
  let mut report = PruneReport {
    dry_run,
    ..PruneReport::default()
  };

  if !dry_run {
    for entry in &decision.delete {
      match fs::remove_file(dist_dir.join(&entry.label)) {
        Ok(()) => report.deleted.push(entry.label.clone()),
        Err(e) => report.failed.push((entry.label.clone(), e.to_string())),
      }
    }
  }

  report.decision = decision;
  Ok(report)
}
