//! Progress bars for file sweeps
//!
//! Uses `linya`; bars draw to stderr and stay quiet when it is not a terminal.

use linya::{Bar, Progress};

/// Single bar over a known number of files
pub struct FileProgress {
  progress: Progress,
  bar: Bar,
}

impl FileProgress {
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
