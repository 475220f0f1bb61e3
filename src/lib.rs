//! dupecache - incremental duplicate file finder.
//!
//! Locates duplicate files inside a directory tree, caching per-directory
//! file metadata in hidden scan records so repeated runs avoid
//! recomputation. Duplicates are classified into primary and duplicate
//! copies under a configurable policy, and whole directories that are
//! redundant copies of other directories are detected from the same cache.

pub mod actions;
pub mod cache;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod scanner;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::actions::{clean, delete_empty_dirs, find_empty_dirs, run_report, ReportOptions};
use crate::cache::RecordStore;
use crate::cli::{BuildArgs, Cli, Commands, EmptyArgs, QueryArgs};
use crate::config::Config;
use crate::duplicates::{find_duplicate_dirs, Aggregator, RecordBuilder, SummaryStore};
use crate::error::ExitCode;

/// Run the subcommand selected on the CLI.
///
/// # Errors
///
/// Returns any error the selected pass raised; `main` maps it to
/// [`ExitCode::GeneralError`].
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Build(args) => run_build(&args),
        Commands::List(args) => run_query(&args, false, false),
        Commands::Delete(args) => run_query(&args.query, true, args.trash),
        Commands::Dirs(args) => run_dirs(&args.path),
        Commands::Empty(args) => run_empty(&args),
        Commands::Clean(args) => run_clean(&args.path),
    }
}

/// Build pass: refresh scan records, aggregate, write the summary.
fn run_build(args: &BuildArgs) -> Result<ExitCode> {
    let store = RecordStore::new();

    log::info!("building scan records under {}", args.path.display());
    let visited = RecordBuilder::new(&store, args.rescan).build(&args.path)?;

    log::info!("checking for duplicates");
    let index = Aggregator::new(&store).aggregate(&args.path)?;
    let rows = SummaryStore::new().write(&args.path, &index)?;

    log::info!(
        "scanned {} directories, {} duplicated files in summary",
        visited,
        rows
    );
    Ok(ExitCode::Success)
}

/// Query pass: reload the summary, classify, list or delete.
fn run_query(args: &QueryArgs, delete: bool, use_trash: bool) -> Result<ExitCode> {
    let groups = SummaryStore::new().read(&args.path)?;
    let config = Config::load(&args.path)?;

    let stats = run_report(
        &args.path,
        &groups,
        &config,
        &ReportOptions {
            sort: args.sort,
            include_all_ties: args.include_all_ties,
            print_all: args.print_all,
            delete,
            use_trash,
        },
    )?;

    if stats.groups == 0 {
        Ok(ExitCode::NoDuplicates)
    } else {
        Ok(ExitCode::Success)
    }
}

/// Directory pass: find and print wholly-contained directories.
fn run_dirs(root: &Path) -> Result<ExitCode> {
    let groups = SummaryStore::new().read(root)?;
    println!(
        "{} unique files in {} paths",
        groups.len(),
        groups.values().map(Vec::len).sum::<usize>()
    );

    let store = RecordStore::new();
    let relations = find_duplicate_dirs(&groups, &store)?;
    if relations.is_empty() {
        println!("no duplicate directories found");
        return Ok(ExitCode::NoDuplicates);
    }

    // Group by superset for readable output.
    let mut by_superset: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for relation in relations {
        by_superset
            .entry(relation.superset)
            .or_default()
            .push(relation.subset);
    }
    for (superset, subsets) in by_superset {
        println!("{} has all the files at:", superset.display());
        for subset in subsets {
            println!(" - {}", subset.display());
        }
    }
    Ok(ExitCode::Success)
}

/// Empty pass: list fileless directory subtrees, optionally deleting them.
fn run_empty(args: &EmptyArgs) -> Result<ExitCode> {
    let found = find_empty_dirs(&args.path)?;
    if found.is_empty() {
        println!("no empty directories found");
        return Ok(ExitCode::NoDuplicates);
    }

    println!("empty directories:");
    for dir in &found {
        println!(" - {}", dir.display());
    }

    if args.delete {
        let outcome = delete_empty_dirs(&found)?;
        println!(
            "deleted {} directories, {} skipped",
            outcome.deleted, outcome.skipped
        );
    }
    Ok(ExitCode::Success)
}

/// Clean pass: strip all cache files from the tree.
fn run_clean(root: &Path) -> Result<ExitCode> {
    let store = RecordStore::new();
    let removed = clean(root, &store)?;
    println!("removed {removed} cache files");
    Ok(ExitCode::Success)
}
