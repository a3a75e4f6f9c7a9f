//! Standalone retention sweep

use crate::core::context::PublishContext;
use crate::core::error::{PublishError, PublishResult};
use crate::release::artifact::ArtifactNaming;
use crate::release::prune::{PruneReport, prune_local, prune_remote};
use crate::release::retention::RetentionPolicy;
use crate::remote::WebDavClient;

/// Run the prune command
///
/// With neither `remote` nor `local` set, both targets are swept. A failure
/// on one target does not stop the other.
pub fn run_prune(ctx: &PublishContext, remote: bool, local: bool, dry_run: bool) -> PublishResult<()> {
  let (remote, local) = if remote || local { (remote, local) } else { (true, true) };
  let naming = ArtifactNaming::new(&ctx.config.product.name, &ctx.config.product.extension)?;
  let policy = RetentionPolicy::new(ctx.config.retention.keep);

  if dry_run {
    println!("🔍 Dry-run mode (nothing will be deleted)");
  }
  println!("🗑️  Keeping the newest {} version(s)", policy.keep_count());

  let mut first_error: Option<PublishError> = None;
  let mut failed = 0;

  if remote {
    let store = WebDavClient::new(&ctx.config.remote);
    match prune_remote(&store, &naming, policy, dry_run) {
      Ok(report) => failed += finish(&report, "remote store"),
      Err(e) => {
        println!("❌ Remote retention failed: {}", e);
        first_error.get_or_insert(e.into());
      }
    }
  }

  if local {
    match prune_local(&ctx.dist_dir(), &naming, policy, dry_run) {
      Ok(report) => failed += finish(&report, "local dist"),
      Err(e) => {
        println!("⚠️  Local retention skipped: {}", e);
        first_error.get_or_insert(e);
      }
    }
  }

  if let Some(err) = first_error {
    return Err(err);
  }
  if failed > 0 {
    return Err(PublishError::message(format!("{} deletion(s) failed", failed)));
  }
  Ok(())
}

fn finish(report: &PruneReport, target: &str) -> usize {
  report.print(target);
  report.failed.len()
}
