//! Node metadata helpers used while walking a tree.

use std::ffi::OsStr;
use std::fs::Metadata;
use std::time::SystemTime;

/// Last-modified time in whole seconds since the Unix epoch.
///
/// Sub-second precision is truncated; times before the epoch (or platforms
/// without mtime support) yield 0.
pub fn mtime_secs(metadata: &Metadata) -> u64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Whether a node counts as hidden.
///
/// A name starting with `.` is hidden (except `.` and `..`). On Windows the
/// hidden file attribute also counts.
pub fn is_hidden(name: &OsStr, metadata: Option<&Metadata>) -> bool {
    let name = name.to_string_lossy();
    if name.starts_with('.') && name != "." && name != ".." {
        return true;
    }

    has_hidden_attribute(metadata)
}

#[cfg(windows)]
fn has_hidden_attribute(metadata: Option<&Metadata>) -> bool {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    metadata
        .map(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
        .unwrap_or(false)
}

#[cfg(not(windows))]
fn has_hidden_attribute(_metadata: Option<&Metadata>) -> bool {
    false
}
