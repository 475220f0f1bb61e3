//! Empty-directory detection and removal.
//!
//! A directory is empty when it holds no files anywhere beneath it; nested
//! purely-structural subdirectories do not count against it. Only the
//! topmost empty directory of each such subtree is reported. Symlinks are
//! logged but do not make a directory non-empty; deleting an empty
//! directory removes them along with any cache artifacts inside.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::scanner::{scan_dir, walk_tree};

/// Tally of one empty-directory deletion pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyOutcome {
    /// Directory subtrees removed.
    pub deleted: usize,
    /// Directories skipped because files appeared since the search.
    pub skipped: usize,
}

/// Find the maximal empty directories under `root` (inclusive).
///
/// Emptiness is computed bottom-up over the traversal arena: a directory
/// is empty when it has no direct files and every subdirectory is empty.
/// Of each empty subtree only the root is returned.
///
/// # Errors
///
/// Fails if any directory in the tree cannot be listed.
pub fn find_empty_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let nodes = walk_tree(root)
        .with_context(|| format!("failed to walk tree at {}", root.display()))?;

    let mut empty = vec![true; nodes.len()];
    for (i, node) in nodes.iter().enumerate() {
        let listing = scan_dir(&node.path)
            .with_context(|| format!("failed to list {}", node.path.display()))?;
        for link in &listing.symlinks {
            log::warn!("symlink in candidate directory: {}", link.display());
        }
        if !listing.files.is_empty() {
            empty[i] = false;
        }
    }

    // Children sit after their parent in the arena, so one reverse sweep
    // propagates non-emptiness all the way up.
    for i in (0..nodes.len()).rev() {
        if !empty[i] {
            if let Some(parent) = nodes[i].parent {
                empty[parent] = false;
            }
        }
    }

    Ok(nodes
        .iter()
        .enumerate()
        .filter(|(i, node)| {
            empty[*i] && node.parent.map_or(true, |parent| !empty[parent])
        })
        .map(|(_, node)| node.path.clone())
        .collect())
}

/// Delete each directory in `dirs`, re-verifying emptiness first.
///
/// A directory that gained files between the search and the deletion is
/// skipped with a warning rather than aborting the pass.
///
/// # Errors
///
/// Fails if a still-empty directory cannot be removed.
pub fn delete_empty_dirs(dirs: &[PathBuf]) -> Result<EmptyOutcome> {
    let mut outcome = EmptyOutcome::default();
    for dir in dirs {
        if !is_still_empty(dir)? {
            log::warn!("could not delete {}: no longer empty", dir.display());
            outcome.skipped += 1;
            continue;
        }
        log::debug!("deleting {}", dir.display());
        fs::remove_dir_all(dir)
            .with_context(|| format!("failed to delete {}", dir.display()))?;
        outcome.deleted += 1;
    }
    Ok(outcome)
}

/// Whether no directory under `dir` holds any file.
fn is_still_empty(dir: &Path) -> Result<bool> {
    let nodes = walk_tree(dir)
        .with_context(|| format!("failed to walk tree at {}", dir.display()))?;
    for node in &nodes {
        let listing = scan_dir(&node.path)
            .with_context(|| format!("failed to list {}", node.path.display()))?;
        if !listing.files.is_empty() {
            return Ok(false);
        }
    }
    Ok(true)
}
