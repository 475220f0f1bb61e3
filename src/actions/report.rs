//! Console reporting for the list and delete passes.
//!
//! Groups are classified, ordered by their first primary path, and printed
//! in the `prim:`/`dupl:` layout. Groups where every copy ended up primary
//! are only shown with `--print-all`. In delete mode each group's
//! duplicate set is removed right after it is printed.

use std::path::Path;

use anyhow::Result;
use bytesize::ByteSize;
use yansi::Paint;

use crate::config::Config;
use crate::duplicates::DuplicateGroups;

use super::classify::{classify, Classified, SortContext, SortKey};
use super::delete::{delete_duplicates, DeleteOutcome};

/// What a list/delete pass should do.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    /// Primary-selection policy.
    pub sort: SortKey,
    /// Keep every path tied with the lowest key, not just one.
    pub include_all_ties: bool,
    /// Also print groups whose copies are all primary.
    pub print_all: bool,
    /// Delete the duplicate set of each group.
    pub delete: bool,
    /// Route deletions through the system trash.
    pub use_trash: bool,
}

/// Tally of one list/delete pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportStats {
    /// Duplicate groups in the summary.
    pub groups: usize,
    /// Total paths across all groups.
    pub paths: usize,
    /// Paths classified as duplicates.
    pub duplicate_paths: usize,
    /// Deletion tally; zeroed in list mode.
    pub outcome: DeleteOutcome,
}

/// Classify every group, print the report, and optionally delete.
///
/// # Errors
///
/// Fails if a deletion fails for a reason other than the file being
/// already gone.
pub fn run(
    root: &Path,
    groups: &DuplicateGroups,
    config: &Config,
    opts: &ReportOptions,
) -> Result<ReportStats> {
    let ctx = SortContext {
        root,
        primary_dirs: &config.sorting.primary_directories,
        duplicate_dirs: &config.sorting.duplicate_directories,
    };

    let mut stats = ReportStats {
        groups: groups.len(),
        paths: groups.values().map(Vec::len).sum(),
        ..ReportStats::default()
    };
    println!("{} unique files in {} paths", stats.groups, stats.paths);

    let mut classified: Vec<(u64, Classified)> = groups
        .iter()
        .map(|(key, paths)| (key.size, classify(paths, opts.sort, opts.include_all_ties, &ctx)))
        .collect();
    classified.sort_by_key(|(_, c)| {
        c.primary
            .first()
            .map(|p| p.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });

    let mut reclaimable = 0u64;
    for (size, group) in &classified {
        let has_duplicates = !group.duplicates.is_empty();
        if has_duplicates || opts.print_all {
            for path in &group.primary {
                println!("{} {}", "prim:".green(), path.display());
            }
        }
        if has_duplicates {
            let marker = if opts.delete {
                format!(" {}", "[deleted]".red())
            } else {
                String::new()
            };
            for path in &group.duplicates {
                println!("{} {}{}", "dupl:".yellow(), path.display(), marker);
            }
        }
        if has_duplicates || opts.print_all {
            println!("--");
        }

        stats.duplicate_paths += group.duplicates.len();
        reclaimable += size * group.duplicates.len() as u64;
        if opts.delete {
            stats.outcome.absorb(delete_duplicates(&group.duplicates, opts.use_trash)?);
        }
    }

    if opts.delete {
        println!(
            "deleted {} files ({}), {} already missing",
            stats.outcome.deleted,
            ByteSize(stats.outcome.bytes_freed),
            stats.outcome.missing
        );
    } else {
        println!(
            "{} duplicate files, {} reclaimable",
            stats.duplicate_paths,
            ByteSize(reclaimable)
        );
    }
    Ok(stats)
}
