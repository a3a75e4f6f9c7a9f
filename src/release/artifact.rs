//! Artifact naming convention
//!
//! Binaries are named `{product}_v{major}.{minor}.{patch}.{ext}`. That name is
//! the only link between a file and its version, for both the remote store
//! and the local dist directory.

use crate::release::version::parse_version;
use regex::Regex;
use semver::Version;
use std::path::{Path, PathBuf};

/// What a release artifact is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
  Binary,
  Manifest,
}

impl ArtifactKind {
  pub fn content_type(self) -> &'static str {
    match self {
      ArtifactKind::Binary => "application/octet-stream",
      ArtifactKind::Manifest => "application/json",
    }
  }
}

/// Builds and recognizes versioned binary names for one product
#[derive(Debug, Clone)]
pub struct ArtifactNaming {
  product: String,
  extension: String,
  pattern: Regex,
}

impl ArtifactNaming {
  pub fn new(product: &str, extension: &str) -> Result<Self, regex::Error> {
    let pattern = format!(
      r"^{}_v(\d+\.\d+\.\d+)\.{}$",
      regex::escape(product),
      regex::escape(extension)
    );
    Ok(Self {
      product: product.to_string(),
      extension: extension.to_string(),
      pattern: Regex::new(&pattern)?,
    })
  }

  pub fn product(&self) -> &str {
    &self.product
  }

  /// Canonical binary file name for a version
  pub fn binary_name(&self, version: &Version) -> String {
    format!("{}_v{}.{}", self.product, version, self.extension)
  }

  /// Version encoded in a file name, if it follows the convention
  pub fn parse(&self, file_name: &str) -> Option<Version> {
    let caps = self.pattern.captures(file_name)?;
    parse_version(caps.get(1)?.as_str())
  }

  /// Locate the packaged binary for `version` under `dist_dir`
  ///
  /// The canonical name directly inside `dist_dir` wins. Otherwise the tree is
  /// scanned for any `{product}*.{ext}` file and the first hit is used.
  pub fn locate_binary(&self, dist_dir: &Path, version: &Version) -> Option<PathBuf> {
    let exact = dist_dir.join(self.binary_name(version));
    if exact.is_file() {
      return Some(exact);
    }

    log::debug!("{} not found, scanning {}", exact.display(), dist_dir.display());
    let pattern = format!(
      "{}/**/{}*.{}",
      glob::Pattern::escape(&dist_dir.to_string_lossy()),
      glob::Pattern::escape(&self.product),
      glob::Pattern::escape(&self.extension)
    );
    glob::glob(&pattern)
      .ok()?
      .filter_map(Result::ok)
      .find(|path| path.is_file())
  }
}
