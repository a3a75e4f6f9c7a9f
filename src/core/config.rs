use crate::core::error::{ConfigError, PublishError, PublishResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for dav-publish
/// Searched in order: publish.toml, .publish.toml, .config/publish.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
  pub product: ProductConfig,
  #[serde(default)]
  pub paths: PathsConfig,
  #[serde(default)]
  pub patch: PatchConfig,
  pub remote: RemoteConfig,
  #[serde(default)]
  pub retention: RetentionConfig,
  #[serde(default)]
  pub build: BuildConfig,
}

/// Identity of the released binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
  /// Artifact prefix, e.g. `POE2PriceAid` gives `POE2PriceAid_v1.0.3.exe`
  pub name: String,

  /// Binary extension without the dot
  #[serde(default = "default_extension")]
  pub extension: String,
}

fn default_extension() -> String {
  "exe".to_string()
}

/// Project-relative file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
  #[serde(default = "default_version_file")]
  pub version_file: PathBuf,

  /// Source file carrying the version and update URL literals
  #[serde(default = "default_source_file")]
  pub source_file: PathBuf,

  #[serde(default = "default_manifest_file")]
  pub manifest_file: PathBuf,

  /// Packager output directory
  #[serde(default = "default_dist_dir")]
  pub dist_dir: PathBuf,

  /// Where a copy of the fresh binary is dropped (default: ~/Desktop)
  #[serde(default)]
  pub copy_to: Option<PathBuf>,
}

fn default_version_file() -> PathBuf {
  PathBuf::from("version.txt")
}

fn default_source_file() -> PathBuf {
  PathBuf::from("poe_tools.py")
}

fn default_manifest_file() -> PathBuf {
  PathBuf::from("update.json")
}

fn default_dist_dir() -> PathBuf {
  PathBuf::from("dist")
}

impl Default for PathsConfig {
  fn default() -> Self {
    Self {
      version_file: default_version_file(),
      source_file: default_source_file(),
      manifest_file: default_manifest_file(),
      dist_dir: default_dist_dir(),
      copy_to: None,
    }
  }
}

/// Text substitution rules for the source file
///
/// `version_pattern` must capture (prefix, version, suffix).
/// `url_pattern` must capture (prefix, url, optional `?v=` query, suffix).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchConfig {
  #[serde(default = "default_version_pattern")]
  pub version_pattern: String,

  #[serde(default = "default_url_pattern")]
  pub url_pattern: String,

  /// Encodings tried in order before falling back to statistical detection
  #[serde(default = "default_encodings")]
  pub encodings: Vec<String>,
}

fn default_version_pattern() -> String {
  r#"(self\.current_version\s*=\s*["'])([0-9.]+)(["'])"#.to_string()
}

fn default_url_pattern() -> String {
  r#"(self\.update_url\s*=\s*["'])([^"'?\s]+)(\?v=[0-9.]+)?(["'])"#.to_string()
}

fn default_encodings() -> Vec<String> {
  vec![
    "utf-8".to_string(),
    "gbk".to_string(),
    "gb2312".to_string(),
    "utf-16".to_string(),
  ]
}

impl Default for PatchConfig {
  fn default() -> Self {
    Self {
      version_pattern: default_version_pattern(),
      url_pattern: default_url_pattern(),
      encodings: default_encodings(),
    }
  }
}

/// WebDAV distribution target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
  /// Collection URL that artifacts are PUT into
  pub url: String,

  #[serde(default)]
  pub username: String,

  #[serde(default)]
  pub password: String,

  /// Environment variable that overrides `password` when set
  #[serde(default)]
  pub password_env: Option<String>,

  /// Public prefix that clients download from (default: `url` + "/")
  #[serde(default)]
  pub download_url_base: Option<String>,
}

impl RemoteConfig {
  /// Password after applying the environment override
  pub fn resolved_password(&self) -> String {
    self
      .password_env
      .as_deref()
      .and_then(|var| std::env::var(var).ok())
      .unwrap_or_else(|| self.password.clone())
  }

  /// Public download prefix, always ending in '/'
  pub fn download_base(&self) -> String {
    let base = self
      .download_url_base
      .clone()
      .unwrap_or_else(|| self.url.trim_end_matches('/').to_string());
    if base.ends_with('/') { base } else { format!("{}/", base) }
  }
}

/// How many versioned binaries survive a cleanup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
  #[serde(default = "default_keep")]
  pub keep: usize,
}

fn default_keep() -> usize {
  5
}

impl Default for RetentionConfig {
  fn default() -> Self {
    Self { keep: default_keep() }
  }
}

/// External tools and pre-build hygiene
///
/// Command argv entries may contain `{version}` and `{source}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuildConfig {
  /// Well-formedness check for the patched source (empty = skipped)
  #[serde(default)]
  pub validate: Vec<String>,

  /// Packager invocation
  #[serde(default)]
  pub package: Vec<String>,

  /// Directories whose contents are purged before packaging (`~` expanded)
  #[serde(default)]
  pub cache_dirs: Vec<PathBuf>,

  /// Extensions of stale build files removed from the project tree
  #[serde(default)]
  pub stale_extensions: Vec<String>,
}

impl PublishConfig {
  /// Find config file in search order: publish.toml, .publish.toml, .config/publish.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("publish.toml"),
      path.join(".publish.toml"),
      path.join(".config").join("publish.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the project root (searches multiple locations)
  pub fn load(path: &Path) -> PublishResult<Self> {
    let config_path = Self::find_config_path(path).ok_or_else(|| {
      PublishError::Config(ConfigError::NotFound {
        project_root: path.to_path_buf(),
      })
    })?;
    Self::load_from(&config_path)
  }

  /// Load config from an explicit file
  pub fn load_from(config_path: &Path) -> PublishResult<Self> {
    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: PublishConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    Ok(config)
  }

  /// Validate the configuration
  pub fn validate(&self) -> PublishResult<()> {
    if self.product.name.trim().is_empty() {
      return Err(ConfigError::MissingField {
        field: "product.name".to_string(),
      }
      .into());
    }

    if self.product.extension.is_empty() || self.product.extension.starts_with('.') {
      return Err(invalid("product.extension", "must be a bare extension such as \"exe\""));
    }

    if self.remote.url.trim().is_empty() {
      return Err(ConfigError::MissingField {
        field: "remote.url".to_string(),
      }
      .into());
    }

    if self.retention.keep == 0 {
      return Err(invalid("retention.keep", "must keep at least one version"));
    }

    check_pattern("patch.version_pattern", &self.patch.version_pattern, 3)?;
    check_pattern("patch.url_pattern", &self.patch.url_pattern, 4)?;

    for label in &self.patch.encodings {
      if encoding_rs::Encoding::for_label(label.as_bytes()).is_none() {
        return Err(invalid("patch.encodings", &format!("unknown encoding '{}'", label)));
      }
    }

    if self.build.package.is_empty() {
      return Err(ConfigError::MissingField {
        field: "build.package".to_string(),
      }
      .into());
    }

    Ok(())
  }
}

fn invalid(field: &str, reason: &str) -> PublishError {
  PublishError::Config(ConfigError::Invalid {
    field: field.to_string(),
    reason: reason.to_string(),
  })
}

fn check_pattern(field: &str, pattern: &str, groups: usize) -> PublishResult<()> {
  let re = regex::Regex::new(pattern).map_err(|e| invalid(field, &e.to_string()))?;
  // captures_len counts the implicit whole-match group
  if re.captures_len() != groups + 1 {
    return Err(invalid(
      field,
      &format!("expected {} capture groups, found {}", groups, re.captures_len() - 1),
    ));
  }
  Ok(())
}
