//! Bounded-prefix CRC32 checksumming.
//!
//! File identity is the CRC32 of at most the first [`MAX_PREFIX`] bytes.
//! Capping the read keeps large files cheap; combined with the file size in
//! the index key, the prefix is a strong enough identity for grouping.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::ScanError;

/// Checksum at most this many leading bytes of a file.
pub const MAX_PREFIX: u64 = 4 * 1024 * 1024;

/// Read granularity for the checksum loop.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// CRC32 of the first [`MAX_PREFIX`] bytes of the file at `path`.
///
/// Reads in [`CHUNK_SIZE`] chunks and stops at the cap, so the cost is
/// bounded regardless of file size. Any read failure is an error; a file
/// that cannot be checksummed cannot be cached.
pub fn prefix_crc32(path: &Path) -> Result<u32, ScanError> {
    let io_err = |source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_err)?;
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = [0u8; CHUNK_SIZE];
    let mut remaining = MAX_PREFIX;

    while remaining > 0 {
        let want = CHUNK_SIZE.min(remaining as usize);
        let read = file.read(&mut buf[..want]).map_err(io_err)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
        remaining -= read as u64;
    }

    Ok(hasher.finalize())
}
