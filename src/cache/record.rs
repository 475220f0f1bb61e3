//! Scan record row type.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::scanner::{prefix_crc32, ScanError};

/// One file's cached identity inside its directory's scan record.
///
/// `dups` holds paths, relative to the owning directory, of descendant
/// files sharing this file's checksum and size. It is empty until the
/// aggregator runs and is replaced wholesale on every aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Basename, unique within the owning directory.
    pub name: String,
    /// File size in bytes.
    pub size: u64,
    /// Bounded-prefix CRC32 of the file content.
    pub csum: u32,
    /// Last-modified time, unix seconds.
    pub m_time: i64,
    /// Relative paths of descendant duplicates of this file.
    pub dups: Vec<String>,
}

/// The cached columns a light rescan copies when a file name matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedMeta {
    /// Cached file size in bytes.
    pub size: u64,
    /// Cached bounded-prefix checksum.
    pub csum: u32,
    /// Cached mtime, unix seconds.
    pub m_time: i64,
}

impl FileRecord {
    /// Build a fresh record for the file at `path`: stat it and checksum
    /// its prefix. `dups` starts empty.
    ///
    /// # Errors
    ///
    /// Any stat or read failure is a [`ScanError`]; the caller treats it as
    /// fatal because a partial identity must not be cached.
    pub fn scan(path: &Path) -> Result<Self, ScanError> {
        let meta = fs::symlink_metadata(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            size: meta.len(),
            csum: prefix_crc32(path)?,
            m_time: unix_seconds(meta.modified().unwrap_or(UNIX_EPOCH)),
            dups: Vec::new(),
        })
    }

    /// Rebuild a record from a cached row, with `dups` reset.
    #[must_use]
    pub fn from_cached(name: String, meta: CachedMeta) -> Self {
        Self {
            name,
            size: meta.size,
            csum: meta.csum,
            m_time: meta.m_time,
            dups: Vec::new(),
        }
    }
}

/// Convert a [`SystemTime`] to signed unix seconds.
fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}
