//! Disk Snapshot Library
//!
//! Records directory trees into compact binary snapshots and compares them.

pub mod cli;
pub mod config;
pub mod display;
pub mod fs;
pub mod snapshot;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use utils::errors::SnapshotError;
pub type Result<T> = std::result::Result<T, SnapshotError>;
