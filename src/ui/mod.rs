//! Operator-facing terminal interaction
//!
//! - **prompt**: confirmations and manual version entry
//! - **progress**: `linya` bars for file sweeps

pub mod progress;
pub mod prompt;
