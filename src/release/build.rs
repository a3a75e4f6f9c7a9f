//! External tools: source check and packager
//!
//! Both are opaque argv lists from publish.toml. `{version}` and `{source}`
//! placeholders are substituted before the command runs in the project root.
//! Only the exit status matters; stderr becomes the diagnostic on failure.

use crate::core::error::{BuildError, ValidationError};
use semver::Version;
use std::io;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// An argv with placeholders already filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
  argv: Vec<String>,
}

impl ToolCommand {
  pub fn render(template: &[String], version: &Version, source: &Path) -> Option<Self> {
    if template.is_empty() {
      return None;
    }
    let version = version.to_string();
    let source = source.to_string_lossy();
    let argv = template
      .iter()
      .map(|arg| arg.replace("{version}", &version).replace("{source}", &source))
      .collect();
    Some(Self { argv })
  }

  pub fn display(&self) -> String {
    self.argv.join(" ")
  }

  fn output(&self, cwd: &Path) -> io::Result<Output> {
    let (program, args) = self
      .argv
      .split_first()
      .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;
    log::debug!("running {} in {}", self.display(), cwd.display());
    Command::new(program)
      .args(args)
      .current_dir(cwd)
      .stdin(Stdio::null())
      .output()
  }
}

/// Failure text: stderr, or stdout when the tool reports there instead
fn diagnostic(output: &Output) -> String {
  let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
  if !stderr.is_empty() {
    return stderr;
  }
  let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
  if stdout.is_empty() {
    format!("exited with {}", output.status)
  } else {
    stdout
  }
}

/// Run the well-formedness check on the patched source
pub fn check_source(command: &ToolCommand, cwd: &Path) -> Result<(), ValidationError> {
  let output = command.output(cwd).map_err(|source| ValidationError::Spawn {
    command: command.display(),
    source,
  })?;
  if output.status.success() {
    Ok(())
  } else {
    Err(ValidationError::Rejected {
      command: command.display(),
      diagnostic: diagnostic(&output),
    })
  }
}

/// Run the packager
pub fn package(command: &ToolCommand, cwd: &Path) -> Result<(), BuildError> {
  let output = command.output(cwd).map_err(|source| BuildError::Spawn {
    command: command.display(),
    source,
  })?;
  if output.status.success() {
    Ok(())
  } else {
    Err(BuildError::Failed {
      command: command.display(),
      stderr: diagnostic(&output),
    })
  }
}
