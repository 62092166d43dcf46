//! Snapshot binary format.
//!
//! ## Layout
//!
//! ```text
//! [Magic: 10 bytes "DISK01SNAP"]
//! For each entry, in walk order:
//!   [Type: u8 (1=File, 2=Directory, 3=Symlink)]
//!   [Path Length: u16 LE]
//!   [Path: UTF-8 bytes]
//!   [Size: u64 LE]
//!   [Mtime: u64 LE, seconds since epoch]
//!   [Hash: 32 bytes SHA-256, zero unless File]
//! ```
//!
//! There is no trailer and no record count; the snapshot ends at end of input.
//! Hierarchy is implicit in record order and path prefixes.

use crate::utils::errors::{Result, SnapshotError};
use byteorder::{LittleEndian, WriteBytesExt};
use std::fmt;
use std::io::Write;

/// Magic bytes at the start of every snapshot
pub const MAGIC: &[u8; 10] = b"DISK01SNAP";

/// Length of a content digest
pub const HASH_LEN: usize = 32;

/// Bytes before the path: type + path length
pub const RECORD_HEADER_LEN: usize = 1 + 2;

/// Bytes after the path: size + mtime + hash
pub const RECORD_TAIL_LEN: usize = 8 + 8 + HASH_LEN;

/// Longest path a record can carry
pub const MAX_PATH_LEN: usize = u16::MAX as usize;

/// SHA-256 digest of file content
pub type Digest = [u8; HASH_LEN];

/// Digest recorded for directories and symlinks
pub const ZERO_HASH: Digest = [0u8; HASH_LEN];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum EntryType {
    File = 1,
    Directory = 2,
    Symlink = 3,
}

impl EntryType {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(EntryType::File),
            2 => Some(EntryType::Directory),
            3 => Some(EntryType::Symlink),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Short uppercase label used in listings
    pub fn label(self) -> &'static str {
        match self {
            EntryType::File => "FILE",
            EntryType::Directory => "DIR",
            EntryType::Symlink => "SYMLINK",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One record of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub entry_type: EntryType,

    /// Path relative to the parent of the snapshotted directory
    pub path: String,

    /// Content length in bytes (0 unless File)
    pub size: u64,

    /// Last-modified seconds since epoch (0 for Symlink)
    pub mtime: u64,

    /// Content digest (zero unless File)
    pub hash: Digest,
}

impl Entry {
    pub fn file(path: impl Into<String>, size: u64, mtime: u64, hash: Digest) -> Self {
        Self {
            entry_type: EntryType::File,
            path: path.into(),
            size,
            mtime,
            hash,
        }
    }

    pub fn directory(path: impl Into<String>, mtime: u64) -> Self {
        Self {
            entry_type: EntryType::Directory,
            path: path.into(),
            size: 0,
            mtime,
            hash: ZERO_HASH,
        }
    }

    pub fn symlink(path: impl Into<String>) -> Self {
        Self {
            entry_type: EntryType::Symlink,
            path: path.into(),
            size: 0,
            mtime: 0,
            hash: ZERO_HASH,
        }
    }

    /// Identity used to match entries across snapshots
    pub fn key(&self) -> (EntryType, &str) {
        (self.entry_type, self.path.as_str())
    }

    /// Size of this entry once encoded
    pub fn encoded_len(&self) -> usize {
        RECORD_HEADER_LEN + self.path.len() + RECORD_TAIL_LEN
    }

    /// Lowercase hex of the content digest
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Serialize this entry as one record.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let path_bytes = self.path.as_bytes();
        let path_len = u16::try_from(path_bytes.len()).map_err(|_| SnapshotError::PathTooLong {
            path: self.path.clone(),
            len: path_bytes.len(),
        })?;

        writer.write_u8(self.entry_type.to_byte())?;
        writer.write_u16::<LittleEndian>(path_len)?;
        writer.write_all(path_bytes)?;
        writer.write_u64::<LittleEndian>(self.size)?;
        writer.write_u64::<LittleEndian>(self.mtime)?;
        writer.write_all(&self.hash)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_bytes() {
        assert_eq!(EntryType::File.to_byte(), 1);
        assert_eq!(EntryType::Directory.to_byte(), 2);
        assert_eq!(EntryType::Symlink.to_byte(), 3);
        assert_eq!(EntryType::from_byte(2), Some(EntryType::Directory));
        assert_eq!(EntryType::from_byte(0), None);
        assert_eq!(EntryType::from_byte(4), None);
    }

    #[test]
    fn test_file_record_layout() -> Result<()> {
        let entry = Entry::file("root/a.txt", 3, 0x0102, [0xAB; HASH_LEN]);
        let mut buf = Vec::new();
        entry.write_to(&mut buf)?;

        assert_eq!(buf.len(), entry.encoded_len());
        assert_eq!(buf.len(), 3 + 10 + 48);
        assert_eq!(buf[0], 1);
        assert_eq!(&buf[1..3], &[10, 0]);
        assert_eq!(&buf[3..13], b"root/a.txt");
        assert_eq!(&buf[13..21], &3u64.to_le_bytes());
        assert_eq!(&buf[21..29], &[0x02, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&buf[29..], &[0xAB; HASH_LEN]);
        Ok(())
    }

    #[test]
    fn test_symlink_record_is_zero_filled() -> Result<()> {
        let mut buf = Vec::new();
        Entry::symlink("root/link").write_to(&mut buf)?;

        assert_eq!(buf[0], 3);
        assert!(buf[3 + "root/link".len()..].iter().all(|b| *b == 0));
        Ok(())
    }

    #[test]
    fn test_path_length_is_utf8_byte_length() -> Result<()> {
        let entry = Entry::directory("根/子", 7);
        let mut buf = Vec::new();
        entry.write_to(&mut buf)?;

        let expected = "根/子".len() as u16;
        assert_eq!(&buf[1..3], &expected.to_le_bytes());
        Ok(())
    }

    #[test]
    fn test_overlong_path_is_rejected() {
        let entry = Entry::directory("x".repeat(MAX_PATH_LEN + 1), 0);
        let mut buf = Vec::new();

        let result = entry.write_to(&mut buf);
        assert!(matches!(result, Err(SnapshotError::PathTooLong { len, .. }) if len == MAX_PATH_LEN + 1));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_key_includes_type() {
        let file = Entry::file("root/p", 1, 1, ZERO_HASH);
        let dir = Entry::directory("root/p", 1);
        assert_ne!(file.key(), dir.key());
        assert_eq!(file.key().1, dir.key().1);
    }
}
