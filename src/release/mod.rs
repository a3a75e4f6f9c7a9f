//! Release building blocks and the pipeline that strings them together
//!
//! # Architecture
//!
//! - **version**: persistent `major.minor.patch` counter
//! - **patch** / **encoding**: in-place source rewrite that keeps the file's encoding
//! - **manifest**: `update.json` advertised to installed clients
//! - **build**: external source check and packager
//! - **hygiene**: cache purge before packaging
//! - **artifact**: `{product}_v{version}.{ext}` naming and lookup
//! - **retention** / **prune**: keep the newest N binaries, remote and local
//! - **pipeline**: the ten-stage release run

pub mod artifact;
pub mod build;
pub mod encoding;
pub mod hygiene;
pub mod manifest;
pub mod patch;
pub mod pipeline;
pub mod prune;
pub mod retention;
pub mod version;

pub use pipeline::{Halt, ReleaseOptions, ReleaseOutcome, ReleasePipeline, UploadOutcome};
