//! Per-directory scan record cache.
//!
//! Every scanned directory carries a hidden record file listing its direct
//! files with cached size, checksum, and mtime. Repeated builds reuse these
//! records according to the rescan mode instead of re-checksumming the
//! whole tree.
//!
//! # Layout
//!
//! * [`record`]: the [`FileRecord`] row type and fresh-scan construction.
//! * [`store`]: CSV persistence of whole records, plus the index views the
//!   aggregator and the light rescan consume.
//!
//! # Invalidation
//!
//! There is no per-entry invalidation. A directory's record is rebuilt
//! wholesale when the directory is rescanned; under the `light` mode rows
//! are matched by file name only. Malformed record contents are fatal: the
//! operator runs `clean` and rebuilds rather than trusting a repair.

pub mod record;
pub mod store;

use std::path::PathBuf;

pub use record::{CachedMeta, FileRecord};
pub use store::RecordStore;

/// Fixed hidden filename of a directory's scan record.
pub const RECORD_NAME: &str = ".dupecache_record";

/// Fixed filename holding the immediately prior scan record.
pub const BACKUP_NAME: &str = ".dupecache_record_prev";

/// Errors raised by the scan record and summary stores.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// No persisted table exists where one is required to proceed.
    #[error("no scan data at {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while reading or writing a table.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A persisted table could not be parsed. Not auto-repaired; run
    /// `clean` and rebuild.
    #[error("malformed scan data in {path}: {source}")]
    Malformed {
        /// Path of the unreadable table
        path: PathBuf,
        /// The underlying CSV error
        #[source]
        source: csv::Error,
    },
}
