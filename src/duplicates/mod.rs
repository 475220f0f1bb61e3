//! Duplicate detection engine.
//!
//! A *build* pass runs two phases over the tree:
//!
//! 1. [`builder`]: materialize a current scan record for every directory,
//!    reusing cached rows according to the rescan mode;
//! 2. [`aggregator`]: merge per-directory checksum indexes bottom-up,
//!    rewriting each record's duplicate annotations on the way, and hand
//!    the fully merged index to the [`summary`] store.
//!
//! Query passes reload the summary and regroup it by identity; the
//! [`dirs`] detector additionally reloads per-directory indexes to find
//! directories wholly contained in other directories.

pub mod aggregator;
pub mod builder;
pub mod dirs;
pub mod index;
pub mod summary;

pub use aggregator::{annotate_records, Aggregator};
pub use builder::{RecordBuilder, RescanMode};
pub use dirs::{find_duplicate_dirs, DirRelation};
pub use index::{ChecksumIndex, ChecksumKey};
pub use summary::{DuplicateGroups, SummaryStore, SUMMARY_NAME};
