//! Snapshot reader.
//!
//! Pure deserialization: validates the magic header, then decodes records
//! one after another until input ends exactly on a record boundary. Input
//! that ends inside a record is rejected; a partial entry is never returned.

use crate::snapshot::format::{Entry, EntryType, HASH_LEN, MAGIC};
use crate::utils::errors::{Result, SnapshotError};
use byteorder::{ByteOrder, LittleEndian};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::info;

/// Sequential decoder over any byte source.
///
/// Yields entries in stored order. The first error ends iteration.
pub struct SnapshotReader<R> {
    reader: R,
    offset: u64,
    header_checked: bool,
    failed: bool,
}

impl<R: Read> SnapshotReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            offset: 0,
            header_checked: false,
            failed: false,
        }
    }

    /// Decode every remaining entry.
    pub fn read_entries(self) -> Result<Vec<Entry>> {
        self.collect()
    }

    fn check_header(&mut self) -> Result<()> {
        let mut magic = [0u8; MAGIC.len()];
        let filled = self.fill(&mut magic)?;
        if filled < magic.len() || &magic != MAGIC {
            return Err(SnapshotError::InvalidFormat(
                "missing DISK01SNAP header".to_string(),
            ));
        }
        self.offset += magic.len() as u64;
        Ok(())
    }

    /// Read until `buf` is full or input ends; returns the bytes read.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    /// Fill `buf` completely or fail as truncated at `record_start`.
    fn fill_record(&mut self, buf: &mut [u8], record_start: u64) -> Result<()> {
        if self.fill(buf)? < buf.len() {
            return Err(SnapshotError::TruncatedFile {
                offset: record_start,
            });
        }
        Ok(())
    }

    fn next_entry(&mut self) -> Result<Option<Entry>> {
        let record_start = self.offset;

        let mut type_byte = [0u8; 1];
        if self.fill(&mut type_byte)? == 0 {
            return Ok(None);
        }

        let mut len_bytes = [0u8; 2];
        self.fill_record(&mut len_bytes, record_start)?;
        let path_len = LittleEndian::read_u16(&len_bytes) as usize;

        let mut path_bytes = vec![0u8; path_len];
        self.fill_record(&mut path_bytes, record_start)?;

        let mut tail = [0u8; 8 + 8 + HASH_LEN];
        self.fill_record(&mut tail, record_start)?;

        let entry_type = EntryType::from_byte(type_byte[0]).ok_or_else(|| {
            SnapshotError::InvalidFormat(format!(
                "unknown entry type {} at byte offset {}",
                type_byte[0], record_start
            ))
        })?;
        let path = String::from_utf8(path_bytes).map_err(|_| {
            SnapshotError::InvalidFormat(format!(
                "entry path is not valid UTF-8 at byte offset {}",
                record_start
            ))
        })?;

        let mut hash = [0u8; HASH_LEN];
        hash.copy_from_slice(&tail[16..]);

        self.offset += (1 + 2 + path_len + tail.len()) as u64;

        Ok(Some(Entry {
            entry_type,
            path,
            size: LittleEndian::read_u64(&tail[0..8]),
            mtime: LittleEndian::read_u64(&tail[8..16]),
            hash,
        }))
    }
}

impl<R: Read> Iterator for SnapshotReader<R> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        if !self.header_checked {
            self.header_checked = true;
            if let Err(e) = self.check_header() {
                self.failed = true;
                return Some(Err(e));
            }
        }

        match self.next_entry() {
            Ok(entry) => entry.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl SnapshotReader<BufReader<File>> {
    /// Open a snapshot file for sequential decoding.
    ///
    /// Fails with [`SnapshotError::NotFound`] if `path` does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| SnapshotError::io(path, e))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

/// Decode the snapshot file at `path` end to end.
pub fn read_snapshot(path: &Path) -> Result<Vec<Entry>> {
    let entries = SnapshotReader::open(path)?.read_entries()?;
    info!("Read {} entries from {}", entries.len(), path.display());
    Ok(entries)
}
