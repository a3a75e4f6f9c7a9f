//! Release pipeline
//!
//! Ten strictly sequential stages. Stages 1-5 and 7 gate everything after
//! them; cleanup (6), the local copy (8), the upload (9) and retention (10)
//! only degrade the final status when they fail.
//!
//! ```text
//!  1 version ─ 2 confirm ─ 3 patch ─ 4 manifest ─ 5 check ─ 6 cleanup
//!      ─ 7 package ─ 8 copy ─ 9 upload ─ 10 retention (remote, then local)
//! ```

use crate::core::context::PublishContext;
use crate::core::error::{BuildError, ConfigError, PublishError, PublishResult, TransferError};
use crate::release::artifact::{ArtifactKind, ArtifactNaming};
use crate::release::build::{self, ToolCommand};
use crate::release::hygiene;
use crate::release::manifest::{ManifestWriter, UpdateManifest};
use crate::release::patch::SourcePatcher;
use crate::release::prune::{self, PruneReport};
use crate::release::retention::RetentionPolicy;
use crate::release::version::VersionStore;
use crate::remote::RemoteStore;
use crate::ui::prompt::Operator;
use semver::Version;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseOptions {
  /// Stop after the local copy: no upload, no retention
  pub skip_upload: bool,
}

/// Why a run stopped early
#[derive(Debug)]
pub enum Halt {
  Cancelled,
  Failed(PublishError),
}

impl Halt {
  fn failed(err: impl Into<PublishError>) -> Self {
    Halt::Failed(err.into())
  }
}

#[derive(Debug)]
pub enum UploadOutcome {
  Uploaded,
  Skipped,
  Failed(String),
}

/// Everything the final summary reports
#[derive(Debug)]
pub struct ReleaseSummary {
  pub version: Version,
  pub dist_dir: PathBuf,
  pub binary: Option<PathBuf>,
  pub copied_to: Option<PathBuf>,
  pub upload: UploadOutcome,
  pub download_url: String,
  pub remote_prune: Option<PruneReport>,
  pub local_prune: Option<PruneReport>,
  pub warnings: Vec<String>,
}

#[derive(Debug)]
pub enum ReleaseOutcome {
  Success(ReleaseSummary),
  SuccessWithWarning(ReleaseSummary),
  Halted(Halt),
}

impl ReleaseOutcome {
  /// Process exit status for this outcome
  pub fn exit_code(&self) -> i32 {
    match self {
      ReleaseOutcome::Success(_) | ReleaseOutcome::SuccessWithWarning(_) => 0,
      ReleaseOutcome::Halted(Halt::Cancelled) => 0,
      ReleaseOutcome::Halted(Halt::Failed(err)) => err.exit_code().as_i32(),
    }
  }

  pub fn summary(&self) -> Option<&ReleaseSummary> {
    match self {
      ReleaseOutcome::Success(summary) | ReleaseOutcome::SuccessWithWarning(summary) => Some(summary),
      ReleaseOutcome::Halted(_) => None,
    }
  }
}

pub struct ReleasePipeline<'a> {
  ctx: &'a PublishContext,
  store: &'a dyn RemoteStore,
  operator: &'a mut dyn Operator,
  options: ReleaseOptions,
  naming: ArtifactNaming,
  patcher: SourcePatcher,
  policy: RetentionPolicy,
}

impl<'a> ReleasePipeline<'a> {
  pub fn new(
    ctx: &'a PublishContext,
    store: &'a dyn RemoteStore,
    operator: &'a mut dyn Operator,
    options: ReleaseOptions,
  ) -> PublishResult<Self> {
    let product = &ctx.config.product;
    Ok(Self {
      ctx,
      store,
      operator,
      options,
      naming: ArtifactNaming::new(&product.name, &product.extension)?,
      patcher: SourcePatcher::new(&ctx.config.patch)?,
      policy: RetentionPolicy::new(ctx.config.retention.keep),
    })
  }

  pub fn run(&mut self) -> ReleaseOutcome {
    match self.run_stages() {
      Ok(summary) if summary.warnings.is_empty() => ReleaseOutcome::Success(summary),
      Ok(summary) => ReleaseOutcome::SuccessWithWarning(summary),
      Err(halt) => {
        match &halt {
          Halt::Cancelled => println!("\n🛑 Release cancelled"),
          Halt::Failed(_) => println!("\n🛑 Release halted"),
        }
        ReleaseOutcome::Halted(halt)
      }
    }
  }

  fn run_stages(&mut self) -> Result<ReleaseSummary, Halt> {
    println!("🚀 Releasing {}", self.naming.product());

    let version = self.resolve_version()?;
    if !self.operator.confirm(&format!("Release version {}?", version), true) {
      return Err(Halt::Cancelled);
    }

    self.patch_source(&version)?;
    let manifest = self.write_manifest(&version)?;
    let mut warnings = Vec::new();
    self.check_source(&version, &mut warnings)?;
    self.clean_caches(&mut warnings)?;
    self.package(&version)?;

    let dist_dir = self.ctx.dist_dir();
    let binary = self.naming.locate_binary(&dist_dir, &version);
    let copied_to = self.copy_binary(binary.as_deref(), &version, &mut warnings);

    let mut summary = ReleaseSummary {
      version,
      dist_dir,
      binary,
      copied_to,
      upload: UploadOutcome::Skipped,
      download_url: manifest.download_url,
      remote_prune: None,
      local_prune: None,
      warnings,
    };

    if self.options.skip_upload {
      println!("\n⏭️  Upload skipped");
      return Ok(summary);
    }

    summary.upload = self.upload(&summary);
    if let UploadOutcome::Failed(reason) = &summary.upload {
      summary.warnings.push(format!("Upload failed: {}", reason));
      return Ok(summary);
    }

    self.apply_retention(&mut summary);
    Ok(summary)
  }

  /// Stage 1: stored counter, or a manually typed version when it is unusable
  fn resolve_version(&mut self) -> Result<Version, Halt> {
    println!("\n🔢 Resolving version...");
    let store = VersionStore::new(self.ctx.version_file());
    match store.next() {
      Ok(version) => {
        println!("✅ Auto-incremented version: {}", version);
        Ok(version)
      }
      Err(e) => {
        println!("❌ {}", e);
        match self.operator.input_version("Enter the new version manually (x.y.z, empty to cancel)") {
          Some(version) => {
            println!("✅ Using version: {}", version);
            Ok(version)
          }
          None => Err(Halt::Cancelled),
        }
      }
    }
  }

  /// Stage 3
  fn patch_source(&self, version: &Version) -> Result<(), Halt> {
    println!("\n📝 Patching source...");
    let report = self
      .patcher
      .patch(&self.ctx.source_file(), version)
      .map_err(|e| {
        println!("❌ Source patch failed");
        Halt::failed(e)
      })?;
    println!(
      "✅ {} patched ({}): {} version literal(s), {} update URL(s)",
      report.path.display(),
      report.encoding,
      report.version_replacements,
      report.url_replacements
    );
    Ok(())
  }

  /// Stage 4
  fn write_manifest(&self, version: &Version) -> Result<UpdateManifest, Halt> {
    let writer = ManifestWriter::new(self.ctx.manifest_file());
    let manifest = writer
      .write(&self.naming, version, &self.ctx.config.remote.download_base())
      .map_err(|e| {
        println!("❌ Manifest write failed");
        Halt::Failed(e)
      })?;
    println!("✅ {} written", writer.path().display());
    Ok(manifest)
  }

  /// Stage 5
  fn check_source(&self, version: &Version, warnings: &mut Vec<String>) -> Result<(), Halt> {
    let source = self.ctx.source_file();
    let Some(command) = ToolCommand::render(&self.ctx.config.build.validate, version, &source) else {
      println!("\n⚠️  No source check configured, packaging an unchecked source");
      warnings.push("Source check skipped: set [build].validate in publish.toml".to_string());
      return Ok(());
    };
    println!("\n🔍 Checking source: {}", command.display());
    build::check_source(&command, &self.ctx.root).map_err(|e| {
      println!("❌ Source check failed");
      Halt::failed(e)
    })?;
    println!("✅ Source check passed");
    Ok(())
  }

  /// Stage 6: best effort; the operator decides whether a failure matters
  fn clean_caches(&mut self, warnings: &mut Vec<String>) -> Result<(), Halt> {
    println!("\n🧹 Cleaning caches...");
    let build_config = &self.ctx.config.build;
    match hygiene::clean_before_packaging(&self.ctx.root, &self.ctx.cache_dirs(), &build_config.stale_extensions) {
      Ok(report) => {
        for (path, reason) in &report.failures {
          println!("  ❌ {}: {}", path.display(), reason);
        }
        if !report.failures.is_empty() {
          warnings.push(format!("{} cache entr(ies) could not be removed", report.failures.len()));
        }
        if report.cleaned_anything() {
          println!("✅ Caches cleaned");
        } else {
          println!("✅ Nothing to clean");
        }
        Ok(())
      }
      Err(e) => {
        println!("⚠️  Cache cleanup failed: {}", e);
        if self.operator.confirm("Cache cleanup failed. Continue packaging anyway?", true) {
          warnings.push(format!("Cache cleanup failed: {}", e));
          Ok(())
        } else {
          Err(Halt::Cancelled)
        }
      }
    }
  }

  /// Stage 7
  fn package(&self, version: &Version) -> Result<(), Halt> {
    let source = self.ctx.source_file();
    let command = ToolCommand::render(&self.ctx.config.build.package, version, &source).ok_or_else(|| {
      Halt::failed(ConfigError::MissingField {
        field: "build.package".to_string(),
      })
    })?;
    println!("\n🔧 Packaging: {}", command.display());
    build::package(&command, &self.ctx.root).map_err(|e| {
      println!("❌ Packaging failed");
      Halt::failed(e)
    })?;
    println!("✅ Packaging complete");
    Ok(())
  }

  /// Stage 8: drop a copy under the canonical name
  fn copy_binary(&self, binary: Option<&Path>, version: &Version, warnings: &mut Vec<String>) -> Option<PathBuf> {
    let Some(dest_dir) = self.ctx.copy_dir() else {
      println!("ℹ️  No copy location available, skipping local copy");
      return None;
    };
    let Some(binary) = binary else {
      let msg = format!("Packaged binary not found in {}", self.ctx.dist_dir().display());
      println!("⚠️  {}", msg);
      warnings.push(msg);
      return None;
    };

    let dest = dest_dir.join(self.naming.binary_name(version));
    match fs::create_dir_all(&dest_dir).and_then(|_| fs::copy(binary, &dest)) {
      Ok(_) => {
        println!("✅ Copied to {}", dest.display());
        Some(dest)
      }
      Err(e) => {
        let msg = format!("Copy to {} failed: {}", dest.display(), e);
        println!("⚠️  {}", msg);
        warnings.push(msg);
        None
      }
    }
  }

  /// Stage 9: binary first, then the manifest
  fn upload(&self, summary: &ReleaseSummary) -> UploadOutcome {
    println!("\n📤 Uploading...");
    match self.upload_artifacts(summary) {
      Ok(()) => {
        println!("✅ Upload complete");
        UploadOutcome::Uploaded
      }
      Err(e) => {
        println!("❌ {}", e);
        println!(
          "⚠️  Upload failed. Upload {} and {} manually to {}",
          self.naming.binary_name(&summary.version),
          self.manifest_name(),
          self.store.location("")
        );
        UploadOutcome::Failed(e.to_string())
      }
    }
  }

  fn upload_artifacts(&self, summary: &ReleaseSummary) -> PublishResult<()> {
    let binary = summary.binary.as_ref().ok_or_else(|| BuildError::ArtifactMissing {
      dist_dir: summary.dist_dir.clone(),
      expected: self.naming.binary_name(&summary.version),
    })?;
    let binary_name = self.naming.binary_name(&summary.version);
    self.upload_file(binary, &binary_name, ArtifactKind::Binary)?;

    let manifest = self.ctx.manifest_file();
    self.upload_file(&manifest, &self.manifest_name(), ArtifactKind::Manifest)?;
    Ok(())
  }

  fn upload_file(&self, path: &Path, name: &str, kind: ArtifactKind) -> Result<(), TransferError> {
    let bytes = fs::read(path).map_err(|source| TransferError::LocalFile {
      path: path.to_path_buf(),
      source,
    })?;
    self.store.upload(name, &bytes, kind.content_type())?;
    println!("  ✅ {} -> {}", name, self.store.location(name));
    Ok(())
  }

  fn manifest_name(&self) -> String {
    self
      .ctx
      .manifest_file()
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_else(|| "update.json".to_string())
  }

  /// Stage 10: remote retention, then local retention
  fn apply_retention(&self, summary: &mut ReleaseSummary) {
    println!("\n🗑️  Applying retention (keep {})...", self.policy.keep_count());

    match prune::prune_remote(self.store, &self.naming, self.policy, false) {
      Ok(report) => {
        report.print("remote store");
        for (name, reason) in &report.failed {
          summary.warnings.push(format!("Remote delete of {} failed: {}", name, reason));
        }
        summary.remote_prune = Some(report);
      }
      Err(e) => {
        println!("⚠️  Remote retention skipped: {}", e);
        summary.warnings.push(format!("Remote retention failed: {}", e));
      }
    }

    match prune::prune_local(&summary.dist_dir, &self.naming, self.policy, false) {
      Ok(report) => {
        report.print("local dist");
        for (name, reason) in &report.failed {
          summary.warnings.push(format!("Local delete of {} failed: {}", name, reason));
        }
        summary.local_prune = Some(report);
      }
      Err(e) => {
        println!("⚠️  Local retention skipped: {}", e);
        summary.warnings.push(format!("Local retention failed: {}", e));
      }
    }
  }
}
