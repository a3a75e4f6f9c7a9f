//! In-place version patching of the application source
//!
//! Two literal substitutions over the raw text, no parsing:
//! - the current-version literal gets the new version
//! - the update-manifest URL gets exactly one `?v=<version>` query
//!
//! A pattern that matches nothing leaves the text as is. Only I/O and
//! encoding failures make the patch fail.

use crate::core::config::PatchConfig;
use crate::core::error::{PatchError, PublishResult};
use crate::release::encoding::{SourceEncoding, detect_and_decode};
use regex::{Captures, Regex};
use semver::Version;
use std::fs;
use std::path::{Path, PathBuf};

/// What a patch run changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
  pub path: PathBuf,
  pub encoding: SourceEncoding,
  pub version_replacements: usize,
  pub url_replacements: usize,
}

pub struct SourcePatcher {
  version_pattern: Regex,
  url_pattern: Regex,
  encodings: Vec<String>,
}

impl SourcePatcher {
  pub fn new(config: &PatchConfig) -> PublishResult<Self> {
    Ok(Self {
      version_pattern: Regex::new(&config.version_pattern)?,
      url_pattern: Regex::new(&config.url_pattern)?,
      encodings: config.encodings.clone(),
    })
  }

  /// Rewrite `path` in place for `version`, keeping its encoding
  pub fn patch(&self, path: &Path, version: &Version) -> Result<PatchReport, PatchError> {
    let bytes = fs::read(path).map_err(|source| PatchError::Io {
      path: path.to_path_buf(),
      source,
    })?;

    let (text, encoding) = detect_and_decode(&bytes, &self.encodings).ok_or_else(|| PatchError::Undecodable {
      path: path.to_path_buf(),
    })?;

    let (patched, version_replacements, url_replacements) = self.apply(&text, version);
    if version_replacements == 0 {
      log::warn!("no version literal found in {}", path.display());
    }
    if url_replacements == 0 {
      log::warn!("no update URL found in {}", path.display());
    }

    let out = encoding.encode(&patched).ok_or_else(|| PatchError::Encoding {
      path: path.to_path_buf(),
      encoding: encoding.to_string(),
    })?;
    fs::write(path, out).map_err(|source| PatchError::Io {
      path: path.to_path_buf(),
      source,
    })?;

    Ok(PatchReport {
      path: path.to_path_buf(),
      encoding,
      version_replacements,
      url_replacements,
    })
  }

  /// Apply both substitutions to `text`, returning the new text and match counts
  pub fn apply(&self, text: &str, version: &Version) -> (String, usize, usize) {
    let version = version.to_string();

    let mut version_hits = 0;
    let text = self.version_pattern.replace_all(text, |caps: &Captures| {
      version_hits += 1;
      format!("{}{}{}", &caps[1], version, &caps[3])
    });

    let mut url_hits = 0;
    let text = self.url_pattern.replace_all(&text, |caps: &Captures| {
      url_hits += 1;
      format!("{}{}?v={}{}", &caps[1], &caps[2], version, &caps[4])
    });

    (text.into_owned(), version_hits, url_hits)
  }
}
