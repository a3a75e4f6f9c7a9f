//! PROPFIND `207 Multi-Status` parsing

use crate::core::error::TransferError;
use crate::utils::href_file_name;

const DAV_NS: &str = "DAV:";

/// Raw `href` of every `response` element, in document order
pub fn response_hrefs(xml: &str) -> Result<Vec<String>, TransferError> {
  let doc = roxmltree::Document::parse(xml).map_err(|e| TransferError::MalformedListing { reason: e.to_string() })?;

  if !doc.root_element().has_tag_name((DAV_NS, "multistatus")) {
    return Err(TransferError::MalformedListing {
      reason: format!("unexpected root element <{}>", doc.root_element().tag_name().name()),
    });
  }

  Ok(
    doc
      .descendants()
      .filter(|node| node.has_tag_name((DAV_NS, "response")))
      .filter_map(|response| {
        response
          .descendants()
          .find(|node| node.has_tag_name((DAV_NS, "href")))
          .and_then(|href| href.text())
          .map(|text| text.trim().to_string())
      })
      .collect(),
  )
}

/// Base file names listed in a multi-status body
///
/// Collections (hrefs ending in '/') are left out.
pub fn file_names(xml: &str) -> Result<Vec<String>, TransferError> {
  Ok(response_hrefs(xml)?.iter().filter_map(|href| href_file_name(href)).collect())
}
