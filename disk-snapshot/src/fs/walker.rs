//! Depth-first directory traversal for snapshots.
//!
//! The walker yields nodes in pre-order: a directory is produced before
//! anything beneath it. Children come in whatever order the platform's
//! directory listing returns them; nothing is sorted.

use crate::fs::metadata::is_hidden;
use crate::utils::errors::{Result, SnapshotError};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Options for directory walking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Skip hidden nodes together with everything below them
    pub ignore_hidden: bool,

    /// Do not emit symlink nodes
    pub ignore_symlinks: bool,

    /// Maximum depth, root = 0 (None = unlimited)
    pub max_depth: Option<usize>,
}

impl WalkOptions {
    /// Apply a depth limit using the command-line convention where any
    /// negative value (normally `-1`) means unlimited.
    pub fn with_depth_limit(mut self, limit: i64) -> Self {
        self.max_depth = usize::try_from(limit).ok();
        self
    }
}

/// Kind of filesystem object a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Directory,
    Symlink,
}

/// A node discovered during walking
#[derive(Debug, Clone)]
pub struct WalkNode {
    /// Full path to the node
    pub path: PathBuf,

    /// Path relative to the parent of the walk root, so the root's own
    /// name is the first component
    pub relative_path: PathBuf,

    /// Depth from the root (root = 0)
    pub depth: usize,

    pub kind: NodeKind,

    /// Metadata of the node; for a link to a file, of the target
    pub metadata: Metadata,
}

/// Directory walker rooted at a canonicalized path
#[derive(Debug, Clone)]
pub struct Walker {
    root: PathBuf,
    base: PathBuf,
    options: WalkOptions,
}

impl Walker {
    /// Create a walker for `root`.
    ///
    /// Fails with [`SnapshotError::NotFound`] if `root` does not exist.
    pub fn new(root: &Path, options: WalkOptions) -> Result<Self> {
        let root = std::fs::canonicalize(root).map_err(|e| SnapshotError::io(root, e))?;
        let base = root
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.clone());

        Ok(Self {
            root,
            base,
            options,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a lazy pre-order walk.
    pub fn walk(&self) -> Walk<'_> {
        let mut walker = WalkDir::new(&self.root).follow_links(false);

        if let Some(max_depth) = self.options.max_depth {
            walker = walker.max_depth(max_depth);
        }

        Walk {
            inner: walker.into_iter(),
            walker: self,
        }
    }
}

/// Iterator over the nodes of a walk.
///
/// The first error ends the useful part of the walk; callers are expected
/// to stop at it.
pub struct Walk<'a> {
    inner: walkdir::IntoIter,
    walker: &'a Walker,
}

impl Iterator for Walk<'_> {
    type Item = Result<WalkNode>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };

            let mut metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => return Some(Err(e.into())),
            };
            let file_type = entry.file_type();

            if self.walker.options.ignore_hidden && is_hidden(entry.file_name(), Some(&metadata)) {
                if file_type.is_dir() {
                    self.inner.skip_current_dir();
                }
                continue;
            }

            let kind = if file_type.is_file() {
                NodeKind::File
            } else if file_type.is_symlink() {
                // A link to a regular file is recorded as that file. Links to
                // directories and dangling links are never followed.
                match std::fs::metadata(entry.path()) {
                    Ok(target) if target.is_file() => {
                        metadata = target;
                        NodeKind::File
                    }
                    _ if self.walker.options.ignore_symlinks => continue,
                    _ => NodeKind::Symlink,
                }
            } else if file_type.is_dir() {
                NodeKind::Directory
            } else {
                // Devices, sockets, fifos: not representable
                tracing::debug!("Skipping special file: {}", entry.path().display());
                continue;
            };

            let relative_path = entry
                .path()
                .strip_prefix(&self.walker.base)
                .unwrap_or(entry.path())
                .to_path_buf();

            return Some(Ok(WalkNode {
                depth: entry.depth(),
                path: entry.into_path(),
                relative_path,
                kind,
                metadata,
            }));
        }
    }
}
