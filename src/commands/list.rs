//! List versioned binaries on the remote store

use crate::core::context::PublishContext;
use crate::core::error::PublishResult;
use crate::release::artifact::ArtifactNaming;
use crate::release::retention::RetentionPolicy;
use crate::remote::{RemoteStore, WebDavClient};
use serde::Serialize;

/// One remote entry as printed by `list --json`
#[derive(Debug, Clone, Serialize)]
pub struct ListedEntry {
  pub name: String,
  pub version: String,
  /// Whether the retention policy would keep it
  pub retained: bool,
}

/// Run the list command
pub fn run_list(ctx: &PublishContext, json: bool) -> PublishResult<()> {
  let store = WebDavClient::new(&ctx.config.remote);
  let entries = list_entries(ctx, &store)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&entries)?);
    return Ok(());
  }

  if entries.is_empty() {
    println!("ℹ️  No versioned {} binaries on {}", ctx.config.product.name, ctx.config.remote.url);
    return Ok(());
  }

  println!(
    "📦 {} on {} (keep {})",
    ctx.config.product.name, ctx.config.remote.url, ctx.config.retention.keep
  );
  println!();
  for entry in &entries {
    let mark = if entry.retained { "✓" } else { "✗" };
    println!("  {} {:<12} {}", mark, entry.version, entry.name);
  }
  Ok(())
}

/// Remote entries newest first, marked by the retention policy
pub fn list_entries(ctx: &PublishContext, store: &dyn RemoteStore) -> PublishResult<Vec<ListedEntry>> {
  let naming = ArtifactNaming::new(&ctx.config.product.name, &ctx.config.product.extension)?;
  let decision = RetentionPolicy::new(ctx.config.retention.keep).decide(store.list(&naming)?);

  let kept = decision.keep.into_iter().map(|entry| (entry, true));
  let dropped = decision.delete.into_iter().map(|entry| (entry, false));
  Ok(
    kept
      .chain(dropped)
      .map(|(entry, retained)| ListedEntry {
        name: entry.label,
        version: entry.version.to_string(),
        retained,
      })
      .collect(),
  )
}
