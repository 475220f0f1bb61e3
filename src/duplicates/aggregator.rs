//! Bottom-up checksum-index aggregation with record rewrites.
//!
//! For every directory, the indexes of its subtrees are merged, the
//! directory's own record is re-annotated against that merge and saved
//! back, and the union travels up to the parent. A file's `dups` field
//! therefore only ever names descendants; duplicates across sibling
//! branches become visible at their common ancestor and, globally, in the
//! summary written from the root index.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cache::{FileRecord, RecordStore};
use crate::scanner::walk_tree;

use super::index::{ChecksumIndex, ChecksumKey};

/// Rewrite each record's `dups` against the merged subtree index.
///
/// Pure: no I/O. Every record's previous annotation is discarded; a record
/// of non-zero size whose identity appears in `subtree` gets that key's
/// paths, relative to `dir`.
pub fn annotate_records(records: &mut [FileRecord], subtree: &ChecksumIndex, dir: &Path) {
    for record in records.iter_mut() {
        record.dups.clear();
        if record.size == 0 {
            continue;
        }
        let key = ChecksumKey {
            csum: record.csum,
            size: record.size,
        };
        if let Some(paths) = subtree.get(&key) {
            record.dups = paths
                .iter()
                .map(|p| {
                    p.strip_prefix(dir)
                        .unwrap_or(p)
                        .to_string_lossy()
                        .into_owned()
                })
                .collect();
        }
    }
}

/// Merges per-directory indexes into the root index, rewriting records
/// along the way.
#[derive(Debug)]
pub struct Aggregator<'a> {
    store: &'a RecordStore,
}

impl<'a> Aggregator<'a> {
    /// Create an aggregator using `store` for record access.
    #[must_use]
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Aggregate the whole tree under `root` and return the fully merged
    /// index. Every directory must already have a scan record.
    ///
    /// Iterative post-order: subtree indexes live in an arena parallel to
    /// the traversal nodes, so nesting depth never touches the call stack.
    ///
    /// # Errors
    ///
    /// A directory without a record is fatal (`NotFound` from the store),
    /// as is any store I/O failure.
    pub fn aggregate(&self, root: &Path) -> Result<ChecksumIndex> {
        let nodes = walk_tree(root)
            .with_context(|| format!("failed to walk tree at {}", root.display()))?;
        let mut pending: Vec<ChecksumIndex> = nodes.iter().map(|_| ChecksumIndex::new()).collect();
        let mut root_index = ChecksumIndex::new();

        for (i, node) in nodes.iter().enumerate().rev() {
            let subtree = std::mem::take(&mut pending[i]);

            let mut records = self
                .store
                .load(&node.path)
                .with_context(|| format!("no scan record for {}", node.path.display()))?;
            annotate_records(&mut records, &subtree, &node.path);
            self.store
                .save(&node.path, &records)
                .with_context(|| format!("failed to rewrite record in {}", node.path.display()))?;

            let mut merged = ChecksumIndex::from_records(&records, &node.path);
            merged.merge(subtree);

            match node.parent {
                Some(parent) => pending[parent].merge(merged),
                None => root_index = merged,
            }
        }
        Ok(root_index)
    }
}
