//! Operator-facing actions over built scan data.
//!
//! - [`classify`]: partition a duplicate group into primary and duplicate
//!   copies under a pluggable sort key.
//! - [`report`]: the list/delete pass over a loaded summary.
//! - [`delete`]: removal of duplicate copies, permanent or via trash.
//! - [`empty`]: detection and removal of fileless directory subtrees.
//! - [`clean`]: strip all cache files from a tree.

pub mod classify;
pub mod clean;
pub mod delete;
pub mod empty;
pub mod report;

pub use classify::{classify, Classified, SortContext, SortKey, NEUTRAL_KEY};
pub use clean::clean;
pub use delete::{delete_duplicates, DeleteOutcome};
pub use empty::{delete_empty_dirs, find_empty_dirs, EmptyOutcome};
pub use report::{run as run_report, ReportOptions, ReportStats};
