//! Retention policy for versioned binaries
//!
//! Pure decision logic shared by the remote store and the local dist
//! directory: sort by version, keep the newest N, delete the rest. Names that
//! do not follow the artifact convention never reach the policy, so they are
//! neither kept nor deleted.

use crate::release::artifact::ArtifactNaming;
use semver::Version;

/// A file that carries a version in its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedEntry {
  pub version: Version,
  pub label: String,
}

/// Partition of a listing into survivors and victims, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionDecision {
  pub keep: Vec<VersionedEntry>,
  pub delete: Vec<VersionedEntry>,
}

impl RetentionDecision {
  pub fn total(&self) -> usize {
    self.keep.len() + self.delete.len()
  }
}

#[derive(Debug, Clone, Copy)]
pub struct RetentionPolicy {
  keep: usize,
}

impl RetentionPolicy {
  pub fn new(keep: usize) -> Self {
    Self { keep }
  }

  pub fn keep_count(&self) -> usize {
    self.keep
  }

  /// Split `entries` into the `keep` newest and the remainder
  ///
  /// Ordering is numeric on the version triple; equal versions keep listing
  /// order.
  pub fn decide(&self, mut entries: Vec<VersionedEntry>) -> RetentionDecision {
    entries.sort_by(|a, b| b.version.cmp(&a.version));
    let delete = if entries.len() > self.keep {
      entries.split_off(self.keep)
    } else {
      Vec::new()
    };
    log::debug!("retention keeps {} and drops {}", entries.len(), delete.len());
    RetentionDecision { keep: entries, delete }
  }

  /// Filter raw names through the naming convention, then decide
  pub fn decide_names<I, S>(&self, naming: &ArtifactNaming, names: I) -> RetentionDecision
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    self.decide(versioned_entries(naming, names))
  }
}

/// Names that follow the artifact convention, paired with their versions
pub fn versioned_entries<I, S>(naming: &ArtifactNaming, names: I) -> Vec<VersionedEntry>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  names
    .into_iter()
    .filter_map(|name| {
      let name = name.as_ref();
      naming.parse(name).map(|version| VersionedEntry {
        version,
        label: name.to_string(),
      })
    })
    .collect()
}
