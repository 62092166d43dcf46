//! Snapshot codec and diff engine.
//!
//! - [`writer`] walks a tree and encodes it
//! - [`reader`] decodes a snapshot back into entries
//! - [`diff`] compares two entry sequences

pub mod diff;
pub mod format;
pub mod hasher;
pub mod reader;
pub mod writer;

pub use diff::{compare, compare_snapshots, Delta, Modification};
pub use format::{Digest, Entry, EntryType, MAGIC, ZERO_HASH};
pub use reader::{read_snapshot, SnapshotReader};
pub use writer::{write_snapshot, SnapshotStats, SnapshotWriter};
