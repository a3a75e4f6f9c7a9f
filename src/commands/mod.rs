//! CLI commands for dav-publish
//!
//! - **release**: run the full release pipeline
//! - **list**: show versioned binaries on the remote store
//! - **prune**: apply the retention policy without releasing
//! - **version**: show or advance the stored version
//!
//! All commands take `&PublishContext` so publish.toml is loaded once.

pub mod list;
pub mod prune;
pub mod release;
pub mod version;

pub use list::run_list;
pub use prune::run_prune;
pub use release::run_release;
pub use version::run_version;
