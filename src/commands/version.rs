//! Inspect or advance the stored version

use crate::core::context::PublishContext;
use crate::core::error::PublishResult;
use crate::release::version::VersionStore;

/// Run the version command
pub fn run_version(ctx: &PublishContext, bump: bool) -> PublishResult<()> {
  let store = VersionStore::new(ctx.version_file());

  if bump {
    let next = store.next()?;
    println!("✅ Version advanced to {}", next);
    return Ok(());
  }

  match store.current()? {
    Some(version) => println!("{}", version),
    None => {
      println!("ℹ️  No version recorded in {}", store.path().display());
      println!("   The first release will be 1.0.1");
    }
  }
  Ok(())
}
