//! Operator prompts
//!
//! The release pipeline asks three kinds of questions: yes/no confirmations,
//! a manually typed version when the stored one is unusable, and a final
//! "press Enter" before the window closes. [`Operator`] is the seam; the
//! terminal implementation uses `dialoguer`.

use crate::release::version::parse_version;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use semver::Version;
use std::io::{self, BufRead, IsTerminal, Write};

pub trait Operator {
  /// Yes/no question. A dismissed or interrupted prompt answers `false`.
  fn confirm(&mut self, question: &str, default: bool) -> bool;

  /// Ask for an `x.y.z` version until a valid one is given. `None` means cancelled.
  fn input_version(&mut self, prompt: &str) -> Option<Version>;

  /// Block until the operator has read the output
  fn acknowledge(&mut self) {}
}

/// Hold the console open until Enter, unless stdin is not a terminal
pub fn pause_before_exit() {
  if !io::stdin().is_terminal() {
    return;
  }
  print!("\nPress Enter to exit...");
  let _ = io::stdout().flush();
  let mut line = String::new();
  let _ = io::stdin().lock().read_line(&mut line);
}

/// Validate operator input for a manual version: digits only, `x.y.z`
pub fn parse_manual_version(input: &str) -> Result<Version, String> {
  parse_version(input).ok_or_else(|| format!("'{}' is not a valid version, use x.y.z (e.g. 1.0.3)", input.trim()))
}

/// Interactive operator on the controlling terminal
pub struct TerminalOperator {
  theme: ColorfulTheme,
  pause_on_exit: bool,
}

impl TerminalOperator {
  pub fn new(pause_on_exit: bool) -> Self {
    Self {
      theme: ColorfulTheme::default(),
      pause_on_exit,
    }
  }
}

impl Operator for TerminalOperator {
  fn confirm(&mut self, question: &str, default: bool) -> bool {
    match Confirm::with_theme(&self.theme)
      .with_prompt(question)
      .default(default)
      .interact_opt()
    {
      Ok(Some(answer)) => answer,
      Ok(None) => false,
      Err(e) => {
        log::debug!("confirmation prompt failed: {}", e);
        false
      }
    }
  }

  fn input_version(&mut self, prompt: &str) -> Option<Version> {
    let answer = Input::<String>::with_theme(&self.theme)
      .with_prompt(prompt)
      .allow_empty(true)
      .validate_with(|input: &String| -> Result<(), String> {
        if input.trim().is_empty() {
          Ok(())
        } else {
          parse_manual_version(input).map(|_| ())
        }
      })
      .interact_text();

    match answer {
      Ok(text) if text.trim().is_empty() => None,
      Ok(text) => parse_manual_version(&text).ok(),
      Err(e) => {
        log::debug!("version prompt failed: {}", e);
        None
      }
    }
  }

  fn acknowledge(&mut self) {
    if self.pause_on_exit {
      pause_before_exit();
    }
  }
}

/// Non-interactive operator for `--yes`: takes every default, never types a version
pub struct AssumeYes;

impl Operator for AssumeYes {
  fn confirm(&mut self, question: &str, default: bool) -> bool {
    println!("{} {}", question, if default { "[yes]" } else { "[no]" });
    default
  }

  fn input_version(&mut self, prompt: &str) -> Option<Version> {
    println!("{} [no input in non-interactive mode]", prompt);
    None
  }
}
