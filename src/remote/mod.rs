//! Remote store abstraction
//!
//! The pipeline only needs three operations from the distribution target:
//! put a file, list the collection one level deep, and delete a file. Each
//! call is independent; there is no transaction spanning them.
//!
//! - **webdav**: `RemoteStore` over HTTP (PUT / PROPFIND / DELETE)
//! - **multistatus**: parsing of PROPFIND `207 Multi-Status` bodies

pub mod multistatus;
pub mod webdav;

use crate::core::error::TransferError;
use crate::release::artifact::ArtifactNaming;
use crate::release::retention::{VersionedEntry, versioned_entries};

pub use webdav::WebDavClient;

/// A versioned binary discovered on the remote store
pub type RemoteEntry = VersionedEntry;

pub trait RemoteStore {
  /// Store `bytes` as `name` in the collection
  fn upload(&self, name: &str, bytes: &[u8], content_type: &str) -> Result<(), TransferError>;

  /// Base names of every entry one level below the collection
  fn list_names(&self) -> Result<Vec<String>, TransferError>;

  /// Remove `name` from the collection
  fn delete(&self, name: &str) -> Result<(), TransferError>;

  /// Entries whose names follow the artifact convention
  fn list(&self, naming: &ArtifactNaming) -> Result<Vec<RemoteEntry>, TransferError> {
    Ok(versioned_entries(naming, self.list_names()?))
  }

  /// Public location of `name`, used in operator messages
  fn location(&self, name: &str) -> String {
    name.to_string()
  }
}
