//! Content hashing for file entries using SHA-256

use crate::snapshot::format::Digest;
use sha2::{Digest as _, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Hash everything `reader` yields.
///
/// Returns the digest and the number of bytes consumed.
pub fn hash_reader<R: Read>(reader: &mut R) -> io::Result<(Digest, u64)> {
    let mut hasher = Sha256::new();
    let len = io::copy(reader, &mut hasher)?;
    Ok((hasher.finalize().into(), len))
}

/// Hash the full content of the file at `path` in a single pass.
pub fn hash_file(path: &Path) -> io::Result<(Digest, u64)> {
    let mut file = File::open(path)?;
    hash_reader(&mut file)
}

/// Hash a byte buffer.
#[cfg(test)]
pub fn hash_bytes(data: &[u8]) -> Digest {
    Sha256::digest(data).into()
}
