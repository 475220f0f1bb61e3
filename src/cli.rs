//! Command-line interface definitions, clap derive API.
//!
//! # Example
//!
//! ```bash
//! # Build scan records and the summary, reusing the cache where possible
//! dupecache build ~/photos --rescan light
//!
//! # List duplicates, preferring shallow copies as primaries
//! dupecache list ~/photos depth
//!
//! # Delete duplicates not under a configured primary directory
//! dupecache delete ~/photos plist --all
//!
//! # Report wholly-contained directories, then strip the cache
//! dupecache dirs ~/photos
//! dupecache clean ~/photos
//!
//! # List fileless directories; add -d to delete them
//! dupecache empty ~/photos
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::actions::SortKey;
use crate::duplicates::RescanMode;

/// Incremental duplicate file finder with per-directory scan record caching.
///
/// A build pass walks the tree once, caches each directory's file identities
/// in a hidden record file, and writes a summary of every duplicated file.
/// Query passes reuse the summary without touching file contents.
#[derive(Debug, Parser)]
#[command(name = "dupecache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build scan records for a tree and write its duplicate summary
    Build(BuildArgs),
    /// List duplicates from the summary under a sort policy
    List(QueryArgs),
    /// Delete the duplicate copies selected by a sort policy
    Delete(DeleteArgs),
    /// Report directories whose files all exist in another directory
    Dirs(PathArgs),
    /// Find directories containing no files anywhere beneath them
    Empty(EmptyArgs),
    /// Remove all scan records and backups from a tree
    Clean(PathArgs),
}

/// Arguments for the empty subcommand.
#[derive(Debug, Args)]
pub struct EmptyArgs {
    /// Root directory of the tree
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Delete the empty directories instead of only listing them
    #[arg(short = 'd', long)]
    pub delete: bool,
}

/// Arguments for the build subcommand.
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Root directory to scan
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Cache-reuse strategy for existing scan records
    #[arg(long, value_enum, default_value = "none")]
    pub rescan: RescanMode,
}

/// Arguments shared by the list and delete subcommands.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Root directory holding the summary
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Key selecting which copy of a group is primary (lowest value wins)
    #[arg(value_name = "SORT", value_enum)]
    pub sort: SortKey,

    /// Treat every path tied with the lowest sort value as primary
    #[arg(short = 'a', long = "all")]
    pub include_all_ties: bool,

    /// Also print groups where all copies are primary
    #[arg(short = 'p', long)]
    pub print_all: bool,
}

/// Arguments for the delete subcommand.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Move duplicates to the system trash instead of deleting permanently
    #[arg(long)]
    pub trash: bool,
}

/// Arguments for subcommands taking only a tree root.
#[derive(Debug, Args)]
pub struct PathArgs {
    /// Root directory of the tree
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}
