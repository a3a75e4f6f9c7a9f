//! Error types for dav-publish with contextual messages and exit codes
//!
//! Errors are grouped by the pipeline stage that raises them, so the release
//! orchestrator can decide whether a failure halts the run or only degrades
//! the final status. Every category can carry a help message for the operator.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for dav-publish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (network, I/O, external tools)
  System = 2,
  /// Validation failure (patched source rejected)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for dav-publish
#[derive(Debug)]
pub enum PublishError {
  /// Configuration errors
  Config(ConfigError),

  /// Version state could not be read, parsed or persisted
  VersionStore(VersionStoreError),

  /// Source file could not be rewritten
  Patch(PatchError),

  /// Patched source failed the well-formedness check
  Validation(ValidationError),

  /// Packaging step failed
  Build(BuildError),

  /// Upload, listing or deletion against the remote store failed
  Transfer(TransferError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl PublishError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    PublishError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    PublishError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      PublishError::Message { message, context, help } => PublishError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      PublishError::Io(e) => PublishError::Message {
        message: ctx_str,
        context: Some(format!("I/O error: {}", e)),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      PublishError::Config(_) => ExitCode::User,
      PublishError::VersionStore(_) => ExitCode::User,
      PublishError::Patch(_) => ExitCode::System,
      PublishError::Validation(_) => ExitCode::Validation,
      PublishError::Build(_) => ExitCode::System,
      PublishError::Transfer(_) => ExitCode::System,
      PublishError::Io(_) => ExitCode::System,
      PublishError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      PublishError::Config(e) => e.help_message(),
      PublishError::VersionStore(e) => e.help_message(),
      PublishError::Transfer(e) => e.help_message(),
      PublishError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for PublishError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PublishError::Config(e) => write!(f, "{}", e),
      PublishError::VersionStore(e) => write!(f, "{}", e),
      PublishError::Patch(e) => write!(f, "{}", e),
      PublishError::Validation(e) => write!(f, "{}", e),
      PublishError::Build(e) => write!(f, "{}", e),
      PublishError::Transfer(e) => write!(f, "{}", e),
      PublishError::Io(e) => write!(f, "I/O error: {}", e),
      PublishError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for PublishError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PublishError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for PublishError {
  fn from(err: io::Error) -> Self {
    PublishError::Io(err)
  }
}

impl From<String> for PublishError {
  fn from(msg: String) -> Self {
    PublishError::message(msg)
  }
}

impl From<&str> for PublishError {
  fn from(msg: &str) -> Self {
    PublishError::message(msg)
  }
}

impl From<toml_edit::de::Error> for PublishError {
  fn from(err: toml_edit::de::Error) -> Self {
    PublishError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<toml_edit::ser::Error> for PublishError {
  fn from(err: toml_edit::ser::Error) -> Self {
    PublishError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<serde_json::Error> for PublishError {
  fn from(err: serde_json::Error) -> Self {
    PublishError::message(format!("JSON error: {}", err))
  }
}

impl From<regex::Error> for PublishError {
  fn from(err: regex::Error) -> Self {
    PublishError::message(format!("Invalid pattern: {}", err))
  }
}

impl From<ConfigError> for PublishError {
  fn from(err: ConfigError) -> Self {
    PublishError::Config(err)
  }
}

impl From<VersionStoreError> for PublishError {
  fn from(err: VersionStoreError) -> Self {
    PublishError::VersionStore(err)
  }
}

impl From<PatchError> for PublishError {
  fn from(err: PatchError) -> Self {
    PublishError::Patch(err)
  }
}

impl From<ValidationError> for PublishError {
  fn from(err: ValidationError) -> Self {
    PublishError::Validation(err)
  }
}

impl From<BuildError> for PublishError {
  fn from(err: BuildError) -> Self {
    PublishError::Build(err)
  }
}

impl From<TransferError> for PublishError {
  fn from(err: TransferError) -> Self {
    PublishError::Transfer(err)
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// publish.toml not found
  NotFound { project_root: PathBuf },

  /// Missing required field
  MissingField { field: String },

  /// Field present but unusable
  Invalid { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Create a publish.toml with at least [product] name and [remote] url.".to_string())
      }
      ConfigError::MissingField { field } => Some(format!("Add `{}` to publish.toml.", field)),
      ConfigError::Invalid { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { project_root } => {
        write!(
          f,
          "No dav-publish configuration found.\nExpected file: {}/publish.toml",
          project_root.display()
        )
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::Invalid { field, reason } => {
        write!(f, "Invalid value for '{}': {}", field, reason)
      }
    }
  }
}

/// Version state file errors
#[derive(Debug)]
pub enum VersionStoreError {
  /// Stored value is not `major.minor.patch`
  Unparsable { path: PathBuf, content: String },

  /// Patch component cannot be advanced any further
  Exhausted { path: PathBuf, current: semver::Version },

  /// Version file could not be read or written
  Io { path: PathBuf, source: io::Error },
}

impl VersionStoreError {
  fn help_message(&self) -> Option<String> {
    match self {
      VersionStoreError::Unparsable { path, .. } => Some(format!(
        "Fix {} so it contains a single line like 1.0.3, or enter the version manually.",
        path.display()
      )),
      VersionStoreError::Exhausted { .. } => {
        Some("Enter the version manually, or raise the minor version in the version file.".to_string())
      }
      VersionStoreError::Io { .. } => None,
    }
  }
}

impl fmt::Display for VersionStoreError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VersionStoreError::Unparsable { path, content } => {
        write!(
          f,
          "Version file {} does not contain a x.y.z version: {:?}",
          path.display(),
          content
        )
      }
      VersionStoreError::Exhausted { path, current } => {
        write!(f, "Version {} in {} cannot be advanced further", current, path.display())
      }
      VersionStoreError::Io { path, source } => {
        write!(f, "Version file {} is not accessible: {}", path.display(), source)
      }
    }
  }
}

/// Source rewriting errors
#[derive(Debug)]
pub enum PatchError {
  /// Reading or writing the source file failed
  Io { path: PathBuf, source: io::Error },

  /// No candidate encoding, nor the detector's guess, decodes the file
  Undecodable { path: PathBuf },

  /// Text could not be represented in the detected encoding
  Encoding { path: PathBuf, encoding: String },
}

impl fmt::Display for PatchError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PatchError::Io { path, source } => {
        write!(f, "Failed to patch {}: {}", path.display(), source)
      }
      PatchError::Undecodable { path } => {
        write!(f, "Failed to patch {}: text encoding could not be determined", path.display())
      }
      PatchError::Encoding { path, encoding } => {
        write!(
          f,
          "Failed to patch {}: patched text cannot be encoded as {}",
          path.display(),
          encoding
        )
      }
    }
  }
}

/// Well-formedness check failure
#[derive(Debug)]
pub enum ValidationError {
  /// Checker ran and rejected the source
  Rejected { command: String, diagnostic: String },

  /// Checker could not be started
  Spawn { command: String, source: io::Error },
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::Rejected { command, diagnostic } => {
        write!(f, "Source check failed ({}):\n{}", command, diagnostic)
      }
      ValidationError::Spawn { command, source } => {
        write!(f, "Failed to run source check '{}': {}", command, source)
      }
    }
  }
}

/// Packaging failures
#[derive(Debug)]
pub enum BuildError {
  /// Packager exited unsuccessfully
  Failed { command: String, stderr: String },

  /// Packager could not be started
  Spawn { command: String, source: io::Error },

  /// Packager succeeded but no artifact was found
  ArtifactMissing { dist_dir: PathBuf, expected: String },
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::Failed { command, stderr } => {
        write!(f, "Packaging failed ({}):\n{}", command, stderr)
      }
      BuildError::Spawn { command, source } => {
        write!(f, "Failed to run packager '{}': {}", command, source)
      }
      BuildError::ArtifactMissing { dist_dir, expected } => {
        write!(f, "No artifact matching {} found in {}", expected, dist_dir.display())
      }
    }
  }
}

/// Remote store failures
#[derive(Debug)]
pub enum TransferError {
  /// Server answered with an unexpected status code
  Status { method: String, url: String, status: u16 },

  /// Request never produced a response
  Network { method: String, url: String, reason: String },

  /// Multi-status body could not be parsed
  MalformedListing { reason: String },

  /// Local file to upload is missing or unreadable
  LocalFile { path: PathBuf, source: io::Error },
}

impl TransferError {
  fn help_message(&self) -> Option<String> {
    match self {
      TransferError::Status { status: 401, .. } | TransferError::Status { status: 403, .. } => {
        Some("Check [remote] username and password (or password_env) in publish.toml.".to_string())
      }
      TransferError::Network { .. } => Some("Check the [remote] url and your network connection.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for TransferError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TransferError::Status { method, url, status } => {
        write!(f, "{} {} failed: HTTP {}", method, url, status)
      }
      TransferError::Network { method, url, reason } => {
        write!(f, "{} {} failed: {}", method, url, reason)
      }
      TransferError::MalformedListing { reason } => {
        write!(f, "Could not parse remote listing: {}", reason)
      }
      TransferError::LocalFile { path, source } => {
        write!(f, "Cannot read {}: {}", path.display(), source)
      }
    }
  }
}

/// Result type alias for dav-publish
pub type PublishResult<T> = Result<T, PublishError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> PublishResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> PublishResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<PublishError>,
{
  fn context(self, ctx: impl Into<String>) -> PublishResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> PublishResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &PublishError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
