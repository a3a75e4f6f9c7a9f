//! Core building blocks shared by every command
//!
//! - **config**: publish.toml parsing and validation
//! - **context**: project root plus config, with resolved paths
//! - **error**: error taxonomy, exit codes and help messages

pub mod config;
pub mod context;
pub mod error;
