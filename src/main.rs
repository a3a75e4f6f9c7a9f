mod commands;
mod core;
mod release;
mod remote;
mod ui;
mod utils;

use clap::{Parser, Subcommand};
use core::context::PublishContext;
use core::error::{ExitCode, PublishError, PublishResult, print_error};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

/// Bump, patch, package and publish a desktop build to a WebDAV server
#[derive(Parser)]
#[command(name = "dav-publish")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Path to publish.toml (default: search the current directory)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Show debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the full release: version, patch, check, package, upload, retention
  Release {
    /// Accept every default without prompting
    #[arg(short, long)]
    yes: bool,
    /// Do not wait for Enter before exiting
    #[arg(long)]
    no_pause: bool,
    /// Build and copy locally, but do not upload or prune
    #[arg(long)]
    skip_upload: bool,
  },

  /// List versioned binaries on the remote store
  List {
    /// Output entries in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Apply the retention policy without releasing
  Prune {
    /// Only prune the remote store
    #[arg(long)]
    remote: bool,
    /// Only prune the local dist directory
    #[arg(long)]
    local: bool,
    /// Show what would be deleted without deleting
    #[arg(long)]
    dry_run: bool,
  },

  /// Show the stored version
  Version {
    /// Advance the stored version by one patch and print it
    #[arg(long)]
    bump: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_logging(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
    .format_timestamp(None)
    .init();
}

impl Commands {
  /// Interactive releases keep the console open on every exit path
  fn pauses_on_exit(&self) -> bool {
    matches!(
      self,
      Commands::Release {
        yes: false,
        no_pause: false,
        ..
      }
    )
  }
}

fn main() {
  let cli = Cli::parse();
  init_logging(cli.verbose);
  let pause = cli.command.pauses_on_exit();

  if let Err(e) = ctrlc::set_handler(move || {
    println!("\n\nOperation cancelled");
    if pause {
      ui::prompt::pause_before_exit();
    }
    std::process::exit(130);
  }) {
    log::warn!("could not install Ctrl-C handler: {}", e);
  }

  let project_root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => handle_error(
      PublishError::message(format!("Failed to get current directory: {}", e)),
      pause,
    ),
  };

  let ctx = match PublishContext::build(&project_root, cli.config.as_deref()) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e, pause),
  };
  log::debug!("project root: {}", ctx.root.display());

  // The default hook has already printed the panic message by the time this returns
  let result = match panic::catch_unwind(AssertUnwindSafe(|| dispatch(cli.command, &ctx))) {
    Ok(result) => result,
    Err(_) => {
      log::error!("dav-publish stopped on an internal error");
      eprintln!("❌ dav-publish stopped unexpectedly");
      exit_after_pause(ExitCode::System.as_i32(), pause)
    }
  };

  match result {
    Ok(0) => {}
    Ok(code) => std::process::exit(code),
    Err(err) => handle_error(err, pause),
  }
}

fn dispatch(command: Commands, ctx: &PublishContext) -> PublishResult<i32> {
  match command {
    Commands::Release {
      yes,
      no_pause,
      skip_upload,
    } => commands::run_release(ctx, yes, no_pause, skip_upload),
    Commands::List { json } => commands::run_list(ctx, json).map(|_| 0),
    Commands::Prune {
      remote,
      local,
      dry_run,
    } => commands::run_prune(ctx, remote, local, dry_run).map(|_| 0),
    Commands::Version { bump } => commands::run_version(ctx, bump).map(|_| 0),
  }
}

fn handle_error(err: PublishError, pause: bool) -> ! {
  print_error(&err);
  exit_after_pause(err.exit_code().as_i32(), pause)
}

fn exit_after_pause(code: i32, pause: bool) -> ! {
  if pause {
    ui::prompt::pause_before_exit();
  }
  std::process::exit(code)
}
