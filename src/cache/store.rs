//! CSV persistence for scan records.
//!
//! A record file is a headerless table of `name,size,csum,m_time,dups`
//! rows; `dups` packs the relative duplicate paths with a `|` separator.
//! The format is private to this module; everything else goes through the
//! [`RecordStore`] API.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::duplicates::index::ChecksumIndex;

use super::record::{CachedMeta, FileRecord};
use super::{StoreError, BACKUP_NAME, RECORD_NAME};

/// Separator packing the `dups` list into one CSV column.
const DUPS_SEP: char = '|';

/// On-disk row shape. Kept separate from [`FileRecord`] so the public type
/// never leaks the packed `dups` encoding.
#[derive(Debug, Serialize, Deserialize)]
struct RecordRow {
    name: String,
    size: u64,
    csum: u32,
    m_time: i64,
    dups: String,
}

impl From<&FileRecord> for RecordRow {
    fn from(record: &FileRecord) -> Self {
        Self {
            name: record.name.clone(),
            size: record.size,
            csum: record.csum,
            m_time: record.m_time,
            dups: record.dups.join(&DUPS_SEP.to_string()),
        }
    }
}

impl From<RecordRow> for FileRecord {
    fn from(row: RecordRow) -> Self {
        let dups = if row.dups.is_empty() {
            Vec::new()
        } else {
            row.dups.split(DUPS_SEP).map(str::to_owned).collect()
        };
        Self {
            name: row.name,
            size: row.size,
            csum: row.csum,
            m_time: row.m_time,
            dups,
        }
    }
}

/// Loads and saves per-directory scan records.
///
/// Stateless; it exists as a value so the builder, the aggregator, and the
/// directory detector can take it as an injected collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordStore;

impl RecordStore {
    /// Create a store handle.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Path of the scan record inside `dir`.
    #[must_use]
    pub fn record_path(dir: &Path) -> PathBuf {
        dir.join(RECORD_NAME)
    }

    /// Path of the backup record inside `dir`.
    #[must_use]
    pub fn backup_path(dir: &Path) -> PathBuf {
        dir.join(BACKUP_NAME)
    }

    /// Whether `dir` has a persisted scan record.
    #[must_use]
    pub fn exists(&self, dir: &Path) -> bool {
        Self::record_path(dir).is_file()
    }

    /// Serialize `records` into `dir`'s scan record, clobbering any
    /// existing one.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] on any write failure.
    pub fn save(&self, dir: &Path, records: &[FileRecord]) -> Result<(), StoreError> {
        let path = Self::record_path(dir);
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };

        let file = File::create(&path).map_err(io_err)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        for record in records {
            writer
                .serialize(RecordRow::from(record))
                .map_err(|source| StoreError::Malformed {
                    path: path.clone(),
                    source,
                })?;
        }
        writer.flush().map_err(io_err)?;
        Ok(())
    }

    /// Load `dir`'s scan record.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no record exists, [`StoreError::Malformed`]
    /// if its rows cannot be parsed.
    pub fn load(&self, dir: &Path) -> Result<Vec<FileRecord>, StoreError> {
        let path = Self::record_path(dir);
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
        let mut records = Vec::new();
        for row in reader.deserialize::<RecordRow>() {
            let row = row.map_err(|source| StoreError::Malformed {
                path: path.clone(),
                source,
            })?;
            records.push(FileRecord::from(row));
        }
        Ok(records)
    }

    /// Load `dir`'s record regrouped as a [`ChecksumIndex`], with names
    /// joined onto `dir` and size-0 rows excluded.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`RecordStore::load`].
    pub fn load_index(&self, dir: &Path) -> Result<ChecksumIndex, StoreError> {
        let records = self.load(dir)?;
        Ok(ChecksumIndex::from_records(&records, dir))
    }

    /// Load `dir`'s record keyed by file name, for light rescans.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`RecordStore::load`].
    pub fn load_name_index(&self, dir: &Path) -> Result<HashMap<String, CachedMeta>, StoreError> {
        let records = self.load(dir)?;
        Ok(records
            .into_iter()
            .map(|r| {
                (
                    r.name,
                    CachedMeta {
                        size: r.size,
                        csum: r.csum,
                        m_time: r.m_time,
                    },
                )
            })
            .collect())
    }

    /// Rotate `dir`'s current record to the backup name, clobbering any
    /// older backup. At most one backup is ever retained.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] if the rename fails.
    pub fn rotate_backup(&self, dir: &Path) -> Result<(), StoreError> {
        let record = Self::record_path(dir);
        let backup = Self::backup_path(dir);
        fs::rename(&record, &backup).map_err(|source| StoreError::Io {
            path: record,
            source,
        })
    }

    /// Remove `dir`'s record and backup if present; returns how many files
    /// were deleted. Absent files are not an error.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] for failures other than the file being absent.
    pub fn remove(&self, dir: &Path) -> Result<usize, StoreError> {
        let mut removed = 0;
        for path in [Self::record_path(dir), Self::backup_path(dir)] {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    log::debug!("nothing to remove at {}", path.display());
                }
                Err(source) => return Err(StoreError::Io { path, source }),
            }
        }
        Ok(removed)
    }
}
