//! Filesystem traversal and node metadata.

pub mod metadata;
pub mod walker;

pub use walker::{NodeKind, WalkNode, WalkOptions, Walker};
