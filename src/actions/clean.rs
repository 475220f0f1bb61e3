//! Cache removal: strip every scan record and backup from a tree.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cache::RecordStore;
use crate::scanner::walk_tree;

/// Remove the scan record and backup of every directory under `root`.
/// Returns the number of files removed.
///
/// # Errors
///
/// Fails if the tree cannot be walked or a present record cannot be
/// removed; directories without records are fine.
pub fn clean(root: &Path, store: &RecordStore) -> Result<usize> {
    let nodes =
        walk_tree(root).with_context(|| format!("failed to walk tree at {}", root.display()))?;

    let mut removed = 0;
    for node in &nodes {
        removed += store
            .remove(&node.path)
            .with_context(|| format!("failed to clean {}", node.path.display()))?;
    }
    log::info!("removed {} cache files under {}", removed, root.display());
    Ok(removed)
}
