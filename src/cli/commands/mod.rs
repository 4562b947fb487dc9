//! CLI command implementations
//!
//! Each command returns the process exit code.

pub mod export;
pub mod setup;
pub mod status;
