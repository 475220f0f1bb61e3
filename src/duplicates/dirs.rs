//! Directory-duplicate detection.
//!
//! A directory is a duplicate of another when every `(csum, size)` identity
//! among its direct files also exists among the other's. Candidates come
//! from the duplicate groups: only directories that actually share file
//! identities with somewhere else are worth loading.
//!
//! Only the smallest candidate of each group is tested against the rest;
//! chains of three or more mutually overlapping directories are therefore
//! not resolved transitively. That bound on the comparison work is kept on
//! purpose.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cache::RecordStore;

use super::summary::DuplicateGroups;

/// Ordered containment relation: every identity in `subset`'s record also
/// exists in `superset`'s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirRelation {
    /// The directory whose files all exist elsewhere.
    pub subset: PathBuf,
    /// The directory holding a copy of each of them.
    pub superset: PathBuf,
}

/// Find directories wholly contained in other directories.
///
/// For each group spanning more than one directory, the member
/// directories' indexes are loaded through `store`, sorted ascending by
/// identity count, and the smallest is tested for key-subset containment
/// against each of the others. Groups touching a directory already found
/// to be a subset are skipped, which avoids reloading the same indexes for
/// every group those directories appear in.
///
/// # Errors
///
/// A candidate directory without a scan record is fatal: the relation
/// cannot be decided from partial data.
pub fn find_duplicate_dirs(
    groups: &DuplicateGroups,
    store: &RecordStore,
) -> Result<Vec<DirRelation>> {
    let mut relations: Vec<DirRelation> = Vec::new();
    let mut implicated: HashSet<PathBuf> = HashSet::new();

    for paths in groups.values() {
        let dirs: BTreeSet<PathBuf> = paths
            .iter()
            .filter_map(|p| p.parent().map(Path::to_path_buf))
            .collect();
        if dirs.len() < 2 {
            continue;
        }
        if dirs.iter().any(|d| implicated.contains(d)) {
            continue;
        }

        let mut candidates = Vec::with_capacity(dirs.len());
        for dir in dirs {
            let index = store
                .load_index(&dir)
                .with_context(|| format!("no scan record for candidate {}", dir.display()))?;
            candidates.push((index, dir));
        }
        candidates.sort_by_key(|(index, _)| index.len());

        let (smallest_index, smallest_dir) = candidates.remove(0);
        let mut found = false;
        for (other_index, other_dir) in &candidates {
            if smallest_index.is_key_subset_of(other_index) {
                log::debug!(
                    "{} is contained in {}",
                    smallest_dir.display(),
                    other_dir.display()
                );
                relations.push(DirRelation {
                    subset: smallest_dir.clone(),
                    superset: other_dir.clone(),
                });
                found = true;
            }
        }
        if found {
            implicated.insert(smallest_dir);
        }
    }
    Ok(relations)
}
