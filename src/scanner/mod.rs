//! Directory scanning: single-level listings, whole-tree traversal, and the
//! bounded-prefix checksum engine.
//!
//! The walker never follows symbolic links; link targets are reported in a
//! listing but neither traversed nor checksummed, which keeps cycles out of
//! the traversal by construction.

pub mod checksum;
pub mod walker;

use std::path::PathBuf;

pub use checksum::{prefix_crc32, CHUNK_SIZE, MAX_PREFIX};
pub use walker::{scan_dir, walk_tree, DirNode, Listing};

/// Errors that can occur while scanning the tree.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The traversal root is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while reading a directory or file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
