//! Text encoding detection with lossless write-back
//!
//! Candidates are tried in priority order, each with a full strict decode of
//! the file. When none decodes cleanly, `chardetng` guesses from the first
//! 4 KiB. The encoding chosen for reading is the one used to write back, so an
//! unmodified text re-encodes to the original bytes.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use std::fmt;

/// Bytes fed to the statistical detector
const SNIFF_LEN: usize = 4096;

/// Encoding a source file was read with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
  /// Any encoding `encoding_rs` can both decode and encode
  Standard(&'static Encoding),
  /// UTF-16, which `encoding_rs` only decodes
  Utf16 { big_endian: bool },
}

impl SourceEncoding {
  /// Resolve a WHATWG label such as `utf-8`, `gbk` or `utf-16`
  pub fn for_label(label: &str) -> Option<Self> {
    let encoding = Encoding::for_label(label.trim().as_bytes())?;
    Some(Self::from_encoding(encoding))
  }

  fn from_encoding(encoding: &'static Encoding) -> Self {
    if encoding == UTF_16LE {
      SourceEncoding::Utf16 { big_endian: false }
    } else if encoding == UTF_16BE {
      SourceEncoding::Utf16 { big_endian: true }
    } else {
      SourceEncoding::Standard(encoding)
    }
  }

  /// Strict decode; `None` if any byte sequence is malformed
  pub fn decode(self, bytes: &[u8]) -> Option<String> {
    match self {
      SourceEncoding::Standard(encoding) => encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned()),
      SourceEncoding::Utf16 { big_endian } => {
        let encoding = if big_endian { UTF_16BE } else { UTF_16LE };
        encoding
          .decode_without_bom_handling_and_without_replacement(bytes)
          .map(|text| text.into_owned())
      }
    }
  }

  /// Encode text; `None` if a character has no representation
  pub fn encode(self, text: &str) -> Option<Vec<u8>> {
    match self {
      SourceEncoding::Standard(encoding) => {
        let (bytes, _, had_unmappable) = encoding.encode(text);
        if had_unmappable { None } else { Some(bytes.into_owned()) }
      }
      SourceEncoding::Utf16 { big_endian } => Some(
        text
          .encode_utf16()
          .flat_map(|unit| if big_endian { unit.to_be_bytes() } else { unit.to_le_bytes() })
          .collect(),
      ),
    }
  }
}

impl fmt::Display for SourceEncoding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SourceEncoding::Standard(encoding) => write!(f, "{}", encoding.name()),
      SourceEncoding::Utf16 { big_endian: false } => write!(f, "UTF-16LE"),
      SourceEncoding::Utf16 { big_endian: true } => write!(f, "UTF-16BE"),
    }
  }
}

/// Decode `bytes` with the first candidate that accepts them all
///
/// A UTF-16 candidate honors a leading byte-order mark to pick endianness and
/// otherwise assumes little-endian. Unknown labels are skipped. Returns `None`
/// only if the statistical fallback's guess cannot decode the bytes either.
pub fn detect_and_decode(bytes: &[u8], candidates: &[String]) -> Option<(String, SourceEncoding)> {
  for label in candidates {
    let Some(encoding) = SourceEncoding::for_label(label) else {
      log::debug!("skipping unknown encoding label {:?}", label);
      continue;
    };
    let encoding = match encoding {
      SourceEncoding::Utf16 { .. } => SourceEncoding::Utf16 {
        big_endian: bytes.starts_with(&[0xFE, 0xFF]),
      },
      other => other,
    };
    if let Some(text) = encoding.decode(bytes) {
      log::debug!("decoded {} bytes as {}", bytes.len(), encoding);
      return Some((text, encoding));
    }
  }

  let mut detector = chardetng::EncodingDetector::new();
  let sniff = &bytes[..bytes.len().min(SNIFF_LEN)];
  detector.feed(sniff, sniff.len() == bytes.len());
  let guessed = SourceEncoding::from_encoding(detector.guess(None, true));
  log::debug!("no candidate encoding fits, detector guessed {}", guessed);
  guessed.decode(bytes).map(|text| (text, guessed))
}
