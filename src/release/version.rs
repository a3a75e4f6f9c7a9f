//! Version state file and the next-version counter
//!
//! The state file holds a single `major.minor.patch` line. Versions are
//! `semver::Version` values built without pre-release or build metadata, so
//! their ordering is plain numeric triple comparison.

use crate::core::error::VersionStoreError;
use semver::Version;
use std::fs;
use std::path::{Path, PathBuf};

/// Baseline written when no state exists yet
const SEED_VERSION: Version = Version::new(1, 0, 0);

/// Parse a strict `x.y.z` string into a version
///
/// Each component must be a non-negative integer. Leading zeros are accepted
/// (`1.0.05` is `1.0.5`); anything else, including pre-release tags, is not.
pub fn parse_version(text: &str) -> Option<Version> {
  let mut parts = text.trim().split('.');
  let mut next = || -> Option<u64> {
    let part = parts.next()?;
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
      return None;
    }
    part.parse().ok()
  };
  let (major, minor, patch) = (next()?, next()?, next()?);
  if parts.next().is_some() {
    return None;
  }
  Some(Version::new(major, minor, patch))
}

/// Persistent version counter backed by a text file
pub struct VersionStore {
  path: PathBuf,
}

impl VersionStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Read the stored version without modifying it
  ///
  /// Returns `Ok(None)` when no state file exists yet.
  pub fn current(&self) -> Result<Option<Version>, VersionStoreError> {
    if !self.path.exists() {
      return Ok(None);
    }
    let content = fs::read_to_string(&self.path).map_err(|source| VersionStoreError::Io {
      path: self.path.clone(),
      source,
    })?;
    parse_version(&content)
      .map(Some)
      .ok_or_else(|| VersionStoreError::Unparsable {
        path: self.path.clone(),
        content: content.trim().to_string(),
      })
  }

  /// Advance the counter and return the version to release
  ///
  /// Without prior state the file is seeded with `1.0.0` and `1.0.1` is
  /// returned while the file stays at `1.0.0`. Later calls bump the patch
  /// component of the stored value and persist it.
  pub fn next(&self) -> Result<Version, VersionStoreError> {
    let Some(current) = self.current()? else {
      self.write(&SEED_VERSION)?;
      log::debug!("seeded {} with {}", self.path.display(), SEED_VERSION);
      return Ok(Version::new(SEED_VERSION.major, SEED_VERSION.minor, SEED_VERSION.patch + 1));
    };

    let Some(patch) = current.patch.checked_add(1) else {
      return Err(VersionStoreError::Exhausted {
        path: self.path.clone(),
        current,
      });
    };
    let next = Version::new(current.major, current.minor, patch);
    self.write(&next)?;
    log::debug!("advanced {} from {} to {}", self.path.display(), current, next);
    Ok(next)
  }

  fn write(&self, version: &Version) -> Result<(), VersionStoreError> {
    fs::write(&self.path, version.to_string()).map_err(|source| VersionStoreError::Io {
      path: self.path.clone(),
      source,
    })
  }
}
