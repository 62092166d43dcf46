//! Snapshot writer.
//!
//! Drives a [`Walker`] and encodes each node as one record, in walk order,
//! after the magic header. Everything is single-threaded: each node is
//! stat'ed, hashed if it is a file, and written before the next one is
//! visited.
//!
//! A failure part way through aborts the snapshot. Bytes already flushed to
//! the destination stay there and do not form a valid snapshot.

use crate::fs::metadata::mtime_secs;
use crate::fs::walker::{NodeKind, WalkNode, WalkOptions, Walker};
use crate::snapshot::format::{Entry, EntryType, MAGIC, MAX_PATH_LEN};
use crate::snapshot::hasher::hash_file;
use crate::utils::errors::{Result, SnapshotError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Counts of what a snapshot contains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotStats {
    pub files: usize,
    pub directories: usize,
    pub symlinks: usize,

    /// Sum of file sizes
    pub total_bytes: u64,
}

impl SnapshotStats {
    pub fn entries(&self) -> usize {
        self.files + self.directories + self.symlinks
    }

    fn record(&mut self, entry: &Entry) {
        match entry.entry_type {
            EntryType::File => {
                self.files += 1;
                self.total_bytes += entry.size;
            }
            EntryType::Directory => self.directories += 1,
            EntryType::Symlink => self.symlinks += 1,
        }
    }
}

impl Entry {
    /// Build the record for a walked node, hashing file content.
    pub fn from_node(node: &WalkNode) -> Result<Self> {
        let path = node
            .relative_path
            .to_str()
            .ok_or_else(|| SnapshotError::NonUtf8Path(node.path.clone()))?
            .to_string();

        if path.len() > MAX_PATH_LEN {
            return Err(SnapshotError::PathTooLong {
                len: path.len(),
                path,
            });
        }

        let entry = match node.kind {
            NodeKind::File => {
                let (hash, size) =
                    hash_file(&node.path).map_err(|e| SnapshotError::io(&node.path, e))?;
                Entry::file(path, size, mtime_secs(&node.metadata), hash)
            }
            NodeKind::Directory => Entry::directory(path, mtime_secs(&node.metadata)),
            NodeKind::Symlink => Entry::symlink(path),
        };

        Ok(entry)
    }
}

/// Encodes the tree under one root
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    walker: Walker,
}

impl SnapshotWriter {
    /// Fails with [`SnapshotError::NotFound`] if `root` does not exist.
    pub fn new(root: &Path, options: WalkOptions) -> Result<Self> {
        Ok(Self {
            walker: Walker::new(root, options)?,
        })
    }

    pub fn root(&self) -> &Path {
        self.walker.root()
    }

    /// Write a complete snapshot into `sink`.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<SnapshotStats> {
        let mut stats = SnapshotStats::default();

        sink.write_all(MAGIC)?;

        for node in self.walker.walk() {
            let node = node?;
            let entry = Entry::from_node(&node)?;
            entry.write_to(sink)?;

            debug!(
                "{} {} size={} mtime={}",
                entry.entry_type, entry.path, entry.size, entry.mtime
            );
            stats.record(&entry);
        }

        Ok(stats)
    }

    /// Write a snapshot to `destination`, replacing any existing file and
    /// creating missing parent directories.
    pub fn write_to_path(&self, destination: &Path) -> Result<SnapshotStats> {
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| SnapshotError::io(parent, e))?;
            }
        }

        let file = File::create(destination).map_err(|e| SnapshotError::io(destination, e))?;
        let mut sink = BufWriter::new(file);

        let stats = self.write_to(&mut sink).map_err(|e| {
            warn!(
                "Snapshot of {} aborted, {} is incomplete: {}",
                self.root().display(),
                destination.display(),
                e
            );
            e
        })?;
        sink.flush().map_err(|e| SnapshotError::io(destination, e))?;

        info!(
            "Snapshot of {} written to {}: {} files, {} directories, {} symlinks, {} bytes",
            self.root().display(),
            destination.display(),
            stats.files,
            stats.directories,
            stats.symlinks,
            stats.total_bytes
        );

        Ok(stats)
    }
}

/// Snapshot `root` into the file at `destination`.
pub fn write_snapshot(root: &Path, destination: &Path, options: &WalkOptions) -> Result<SnapshotStats> {
    SnapshotWriter::new(root, options.clone())?.write_to_path(destination)
}
