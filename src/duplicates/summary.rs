//! Duplicate summary: the per-root table of all duplicated files.
//!
//! Written once per build pass from the root's fully merged index; query
//! passes reload it and regroup by identity. Like the scan records it is a
//! headerless CSV table whose format stays private to this module.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cache::StoreError;

use super::index::{ChecksumIndex, ChecksumKey};

/// Fixed hidden filename of the summary inside the scan root.
pub const SUMMARY_NAME: &str = ".dupecache_summary";

/// Duplicate groups reconstructed from a summary: every path set here has
/// cardinality ≥ 2.
pub type DuplicateGroups = BTreeMap<ChecksumKey, Vec<PathBuf>>;

/// On-disk row shape: one duplicated file per row.
#[derive(Debug, Serialize, Deserialize)]
struct SummaryRow {
    path: String,
    size: u64,
    csum: u32,
}

/// Writes and reads the per-root duplicate summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryStore;

impl SummaryStore {
    /// Create a store handle.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Path of the summary inside `root`.
    #[must_use]
    pub fn summary_path(root: &Path) -> PathBuf {
        root.join(SUMMARY_NAME)
    }

    /// Flatten `index` to `(path, size, csum)` rows for every identity
    /// with at least two paths, sorted descending by size, and persist
    /// them. Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] on any write failure.
    pub fn write(&self, root: &Path, index: &ChecksumIndex) -> Result<usize, StoreError> {
        let mut rows: Vec<SummaryRow> = Vec::new();
        for (key, paths) in index.iter() {
            if paths.len() < 2 {
                continue;
            }
            for path in paths {
                rows.push(SummaryRow {
                    path: path.to_string_lossy().into_owned(),
                    size: key.size,
                    csum: key.csum,
                });
            }
        }
        rows.sort_by(|a, b| b.size.cmp(&a.size));

        let path = Self::summary_path(root);
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };
        let file = File::create(&path).map_err(io_err)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        let count = rows.len();
        for row in rows {
            writer
                .serialize(row)
                .map_err(|source| StoreError::Malformed {
                    path: path.clone(),
                    source,
                })?;
        }
        writer.flush().map_err(io_err)?;
        Ok(count)
    }

    /// Reload the summary and regroup rows by `(csum, size)`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when no summary exists (run `build` first),
    /// [`StoreError::Malformed`] when rows cannot be parsed.
    pub fn read(&self, root: &Path) -> Result<DuplicateGroups, StoreError> {
        let path = Self::summary_path(root);
        let file = File::open(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => StoreError::NotFound(path.clone()),
            _ => StoreError::Io {
                path: path.clone(),
                source,
            },
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(file);
        let mut groups = DuplicateGroups::new();
        for row in reader.deserialize::<SummaryRow>() {
            let row = row.map_err(|source| StoreError::Malformed {
                path: path.clone(),
                source,
            })?;
            groups
                .entry(ChecksumKey {
                    csum: row.csum,
                    size: row.size,
                })
                .or_default()
                .push(PathBuf::from(row.path));
        }
        Ok(groups)
    }
}
