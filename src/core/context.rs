//! Project context - build once, pass everywhere
//!
//! `PublishContext` pairs the project root with its loaded configuration and
//! resolves every configured relative path against that root. `main.rs` builds
//! it once and commands receive it by reference.

use crate::core::config::PublishConfig;
use crate::core::error::PublishResult;
use crate::utils::expand_home;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct PublishContext {
  /// Project root directory (absolute path)
  pub root: PathBuf,

  /// Loaded publish.toml
  pub config: PublishConfig,
}

impl PublishContext {
  /// Build the context from a project root, searching for publish.toml
  /// unless an explicit config file is given.
  pub fn build(root: &Path, config_path: Option<&Path>) -> PublishResult<Self> {
    let config = match config_path {
      Some(path) => PublishConfig::load_from(path)?,
      None => PublishConfig::load(root)?,
    };
    Ok(Self::new(root.to_path_buf(), config))
  }

  pub fn new(root: PathBuf, config: PublishConfig) -> Self {
    Self { root, config }
  }

  pub fn version_file(&self) -> PathBuf {
    self.resolve(&self.config.paths.version_file)
  }

  pub fn source_file(&self) -> PathBuf {
    self.resolve(&self.config.paths.source_file)
  }

  pub fn manifest_file(&self) -> PathBuf {
    self.resolve(&self.config.paths.manifest_file)
  }

  pub fn dist_dir(&self) -> PathBuf {
    self.resolve(&self.config.paths.dist_dir)
  }

  /// Local drop location for the fresh binary, if any
  pub fn copy_dir(&self) -> Option<PathBuf> {
    match &self.config.paths.copy_to {
      Some(dir) => Some(self.resolve(dir)),
      None => crate::utils::home_dir().map(|home| home.join("Desktop")).filter(|d| d.is_dir()),
    }
  }

  /// Cache directories with `~` expanded and relatives anchored at the root
  pub fn cache_dirs(&self) -> Vec<PathBuf> {
    self.config.build.cache_dirs.iter().map(|dir| self.resolve(dir)).collect()
  }

  fn resolve(&self, path: &Path) -> PathBuf {
    let expanded = expand_home(path);
    if expanded.is_absolute() {
      expanded
    } else {
      self.root.join(expanded)
    }
  }
}
