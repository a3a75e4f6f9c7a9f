//! Integration tests for dav-publish
//!
//! Every test runs the compiled binary in a temporary project directory.
//! Tests that talk to a remote store use the fake WebDAV server in helpers.

mod helpers;
mod test_config;
mod test_list_prune;
#[cfg(unix)]
mod test_release;
mod test_version;
