//! WebDAV client for the distribution collection
//!
//! Blocking `ureq` agent, basic auth on every request, no retries and no
//! explicit timeout. HTTP status codes come back as values so each operation
//! can judge success by its own set of accepted codes.

use crate::core::config::RemoteConfig;
use crate::core::error::TransferError;
use crate::remote::RemoteStore;
use crate::remote::multistatus;
use crate::utils::encode_path_segment;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const UPLOAD_OK: &[u16] = &[200, 201, 204];
const DELETE_OK: &[u16] = &[200, 204];
const MULTI_STATUS: u16 = 207;

pub struct WebDavClient {
  collection_url: String,
  authorization: String,
  agent: ureq::Agent,
}

impl WebDavClient {
  pub fn new(config: &RemoteConfig) -> Self {
    let credentials = format!("{}:{}", config.username, config.resolved_password());
    let agent_config = ureq::Agent::config_builder()
      .http_status_as_error(false)
      .allow_non_standard_methods(true)
      .build();

    Self {
      collection_url: config.url.trim_end_matches('/').to_string(),
      authorization: format!("Basic {}", STANDARD.encode(credentials)),
      agent: ureq::Agent::new_with_config(agent_config),
    }
  }

  fn file_url(&self, name: &str) -> String {
    format!("{}/{}", self.collection_url, encode_path_segment(name))
  }

  fn read_body(url: &str, response: &mut ureq::http::Response<ureq::Body>) -> Result<String, TransferError> {
    response
      .body_mut()
      .read_to_string()
      .map_err(|e| network_error("PROPFIND", url, e))
  }
}

fn network_error(method: &str, url: &str, err: impl std::fmt::Display) -> TransferError {
  TransferError::Network {
    method: method.to_string(),
    url: url.to_string(),
    reason: err.to_string(),
  }
}

fn check_status(method: &str, url: &str, status: u16, accepted: &[u16]) -> Result<(), TransferError> {
  log::debug!("{} {} -> {}", method, url, status);
  if accepted.contains(&status) {
    Ok(())
  } else {
    Err(TransferError::Status {
      method: method.to_string(),
      url: url.to_string(),
      status,
    })
  }
}

impl RemoteStore for WebDavClient {
  fn upload(&self, name: &str, bytes: &[u8], content_type: &str) -> Result<(), TransferError> {
    let url = self.file_url(name);
    let response = self
      .agent
      .put(&url)
      .header("Authorization", self.authorization.as_str())
      .header("Content-Type", content_type)
      .send(bytes)
      .map_err(|e| network_error("PUT", &url, e))?;
    check_status("PUT", &url, response.status().as_u16(), UPLOAD_OK)
  }

  fn list_names(&self) -> Result<Vec<String>, TransferError> {
    let url = format!("{}/", self.collection_url);
    let request = ureq::http::Request::builder()
      .method("PROPFIND")
      .uri(url.as_str())
      .header("Depth", "1")
      .header("Content-Type", "application/xml")
      .header("Authorization", self.authorization.as_str())
      .body(())
      .map_err(|e| network_error("PROPFIND", &url, e))?;

    let mut response = self.agent.run(request).map_err(|e| network_error("PROPFIND", &url, e))?;
    check_status("PROPFIND", &url, response.status().as_u16(), &[MULTI_STATUS])?;

    let body = Self::read_body(&url, &mut response)?;
    multistatus::file_names(&body)
  }

  fn delete(&self, name: &str) -> Result<(), TransferError> {
    let url = self.file_url(name);
    let response = self
      .agent
      .delete(&url)
      .header("Authorization", self.authorization.as_str())
      .call()
      .map_err(|e| network_error("DELETE", &url, e))?;
    check_status("DELETE", &url, response.status().as_u16(), DELETE_OK)
  }

  fn location(&self, name: &str) -> String {
    self.file_url(name)
  }
}
