//! Update manifest advertised to installed clients
//!
//! One JSON document describing the latest published version. It is fully
//! replaced on every release.

use crate::core::error::{PublishResult, ResultExt};
use crate::release::artifact::ArtifactNaming;
use chrono::NaiveDateTime;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Timestamp layout of `update_time`
pub const UPDATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateManifest {
  pub version: String,
  pub download_url: String,
  pub update_time: String,
}

impl UpdateManifest {
  /// Build the manifest for `version` published under `download_base`
  pub fn new(naming: &ArtifactNaming, version: &Version, download_base: &str, now: NaiveDateTime) -> Self {
    Self {
      version: version.to_string(),
      download_url: format!("{}{}", download_base, naming.binary_name(version)),
      update_time: now.format(UPDATE_TIME_FORMAT).to_string(),
    }
  }

  /// 2-space indented JSON with non-ASCII characters written literally
  pub fn to_json(&self) -> PublishResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}

/// Writes the manifest file at a fixed location
pub struct ManifestWriter {
  path: PathBuf,
}

impl ManifestWriter {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Write the manifest for `version`, stamped with the local wall-clock time
  pub fn write(&self, naming: &ArtifactNaming, version: &Version, download_base: &str) -> PublishResult<UpdateManifest> {
    let manifest = UpdateManifest::new(naming, version, download_base, chrono::Local::now().naive_local());
    self.write_manifest(&manifest)?;
    Ok(manifest)
  }

  pub fn write_manifest(&self, manifest: &UpdateManifest) -> PublishResult<()> {
    let json = manifest.to_json()?;
    fs::write(&self.path, json).with_context(|| format!("Failed to write {}", self.path.display()))
  }
}
