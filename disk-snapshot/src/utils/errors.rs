//! Error types for snapshot creation, decoding and comparison.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid snapshot format: {0}")]
    InvalidFormat(String),

    #[error("Truncated snapshot: incomplete record at byte offset {offset}")]
    TruncatedFile { offset: u64 },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    IoFailure(#[from] io::Error),

    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("Path too long for a snapshot entry ({len} bytes): {path}")]
    PathTooLong { path: String, len: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SnapshotError {
    /// Wrap an I/O error raised while touching `path`.
    ///
    /// A missing path becomes [`SnapshotError::NotFound`].
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            SnapshotError::NotFound(path)
        } else {
            SnapshotError::Io { path, source }
        }
    }
}

impl From<walkdir::Error> for SnapshotError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
        match err.into_io_error() {
            Some(source) => SnapshotError::io(path, source),
            // Only filesystem loops reach here, which cannot happen without following links
            None => SnapshotError::Io {
                path,
                source: io::Error::new(io::ErrorKind::Other, "filesystem loop detected"),
            },
        }
    }
}

impl From<config::ConfigError> for SnapshotError {
    fn from(err: config::ConfigError) -> Self {
        SnapshotError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
