//! Release command implementation
//!
//! Wires the real WebDAV client and a terminal (or `--yes`) operator into
//! the release pipeline, then prints the final summary.

use crate::core::context::PublishContext;
use crate::core::error::{PublishResult, print_error};
use crate::release::pipeline::ReleaseSummary;
use crate::release::{Halt, ReleaseOptions, ReleaseOutcome, ReleasePipeline, UploadOutcome};
use crate::remote::WebDavClient;
use crate::ui::prompt::{AssumeYes, Operator, TerminalOperator};

/// Run the release command, returning the process exit status
pub fn run_release(ctx: &PublishContext, yes: bool, no_pause: bool, skip_upload: bool) -> PublishResult<i32> {
  let store = WebDavClient::new(&ctx.config.remote);
  let mut operator: Box<dyn Operator> = if yes {
    Box::new(AssumeYes)
  } else {
    Box::new(TerminalOperator::new(!no_pause))
  };

  let options = ReleaseOptions { skip_upload };
  let outcome = match ReleasePipeline::new(ctx, &store, operator.as_mut(), options) {
    Ok(mut pipeline) => pipeline.run(),
    Err(err) => {
      println!("❌ Release failed unexpectedly");
      ReleaseOutcome::Halted(Halt::Failed(err))
    }
  };

  match (&outcome, outcome.summary()) {
    (_, Some(summary)) => print_summary(summary),
    (ReleaseOutcome::Halted(Halt::Failed(err)), None) => print_error(err),
    (_, None) => println!("Operation cancelled"),
  }

  operator.acknowledge();
  Ok(outcome.exit_code())
}

fn print_summary(summary: &ReleaseSummary) {
  println!();
  if summary.warnings.is_empty() {
    println!("✨ Release {} completed!", summary.version);
  } else {
    println!("⚠️  Release {} completed with warnings", summary.version);
  }
  println!();
  println!("  Version:   {}", summary.version);
  println!("  Dist:      {}", summary.dist_dir.display());
  if let Some(binary) = &summary.binary {
    println!("  Binary:    {}", binary.display());
  }
  if let Some(copy) = &summary.copied_to {
    println!("  Copy:      {}", copy.display());
  }
  match &summary.upload {
    UploadOutcome::Uploaded => println!("  Upload:    ✅ uploaded"),
    UploadOutcome::Skipped => println!("  Upload:    ⏭️  skipped"),
    UploadOutcome::Failed(reason) => println!("  Upload:    ❌ {}", reason),
  }
  if let Some(report) = &summary.remote_prune {
    println!("  Remote:    {} kept, {} deleted", report.decision.keep.len(), report.deleted.len());
  }
  if let Some(report) = &summary.local_prune {
    println!("  Local:     {} kept, {} deleted", report.decision.keep.len(), report.deleted.len());
  }
  println!("  Download:  {}", summary.download_url);

  if !summary.warnings.is_empty() {
    println!();
    println!("Warnings:");
    for warning in &summary.warnings {
      println!("  - {}", warning);
    }
  }
}
