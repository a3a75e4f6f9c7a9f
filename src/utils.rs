//! Utility functions for cross-platform path handling

use std::path::{Path, PathBuf};

/// Current user's home directory from the environment
///
/// Checks `HOME` first, then `USERPROFILE` for Windows shells.
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("HOME")
    .or_else(|| std::env::var_os("USERPROFILE"))
    .filter(|h| !h.is_empty())
    .map(PathBuf::from)
}

/// Expand a leading `~` to the home directory
///
/// Paths without a leading `~` component, or when no home directory is known,
/// are returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
  let mut components = path.components();
  match components.next() {
    Some(std::path::Component::Normal(first)) if first == "~" => match home_dir() {
      Some(home) => home.join(components.as_path()),
      None => path.to_path_buf(),
    },
    _ => path.to_path_buf(),
  }
}

/// Base file name of a WebDAV href
///
/// Hrefs are percent-encoded. Collections end in '/' and have no file name,
/// so they yield `None` and never reach retention.
pub fn href_file_name(href: &str) -> Option<String> {
  let path = href.trim();
  let last = path.rsplit('/').next().filter(|segment| !segment.is_empty())?;
  Some(percent_encoding::percent_decode_str(last).decode_utf8_lossy().into_owned())
}

/// Percent-encode a file name for use as a URL path segment
pub fn encode_path_segment(name: &str) -> String {
  use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

  const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

  utf8_percent_encode(name, SEGMENT).to_string()
}
