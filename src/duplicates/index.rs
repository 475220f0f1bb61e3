//! Checksum index: files grouped by `(checksum, size)` identity.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cache::FileRecord;

/// The identity two files must share to count as duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChecksumKey {
    /// Bounded-prefix CRC32.
    pub csum: u32,
    /// File size in bytes.
    pub size: u64,
}

/// Map from [`ChecksumKey`] to the set of paths sharing that identity.
///
/// Zero-byte files are never inserted: they would collide spuriously and
/// are excluded from all duplicate detection. Backed by ordered collections
/// so iteration, and everything persisted from it, is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumIndex(BTreeMap<ChecksumKey, BTreeSet<PathBuf>>);

impl ChecksumIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from one directory's records, joining names onto
    /// `dir`. Size-0 rows are skipped.
    #[must_use]
    pub fn from_records(records: &[FileRecord], dir: &Path) -> Self {
        let mut index = Self::new();
        for record in records {
            if record.size == 0 {
                continue;
            }
            index.insert(
                ChecksumKey {
                    csum: record.csum,
                    size: record.size,
                },
                dir.join(&record.name),
            );
        }
        index
    }

    /// Insert one path under `key`. Inserting a size-0 key is a caller bug
    /// and is ignored with a debug log.
    pub fn insert(&mut self, key: ChecksumKey, path: PathBuf) {
        if key.size == 0 {
            log::debug!("refusing zero-size index entry: {}", path.display());
            return;
        }
        self.0.entry(key).or_default().insert(path);
    }

    /// Key-wise union of `other` into `self`, consuming `other`.
    pub fn merge(&mut self, other: Self) {
        for (key, paths) in other.0 {
            self.0.entry(key).or_default().extend(paths);
        }
    }

    /// Paths recorded under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &ChecksumKey) -> Option<&BTreeSet<PathBuf>> {
        self.0.get(key)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &ChecksumKey) -> bool {
        self.0.contains_key(key)
    }

    /// Number of distinct identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no identity is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether every identity in `self` also exists in `other`. Path sets
    /// are irrelevant; containment is over keys only.
    #[must_use]
    pub fn is_key_subset_of(&self, other: &Self) -> bool {
        self.0.keys().all(|key| other.contains_key(key))
    }

    /// Iterate identities and their path sets in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ChecksumKey, &BTreeSet<PathBuf>)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(csum: u32, size: u64) -> ChecksumKey {
        ChecksumKey { csum, size }
    }

    #[test]
    fn test_insert_and_get() {
        let mut index = ChecksumIndex::new();
        index.insert(key(1, 10), PathBuf::from("/a"));
        index.insert(key(1, 10), PathBuf::from("/b"));
        index.insert(key(2, 20), PathBuf::from("/c"));

        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&key(1, 10)).unwrap().len(), 2);
    }

    #[test]
    fn test_insert_dedupes_paths() {
        let mut index = ChecksumIndex::new();
        index.insert(key(1, 10), PathBuf::from("/a"));
        index.insert(key(1, 10), PathBuf::from("/a"));

        assert_eq!(index.get(&key(1, 10)).unwrap().len(), 1);
    }

    #[test]
    fn test_zero_size_never_inserted() {
        let mut index = ChecksumIndex::new();
        index.insert(key(1, 0), PathBuf::from("/empty"));
        assert!(index.is_empty());
    }

    #[test]
    fn test_merge_unions_path_sets() {
        let mut left = ChecksumIndex::new();
        left.insert(key(1, 10), PathBuf::from("/a"));
        let mut right = ChecksumIndex::new();
        right.insert(key(1, 10), PathBuf::from("/b"));
        right.insert(key(2, 20), PathBuf::from("/c"));

        left.merge(right);
        assert_eq!(left.len(), 2);
        assert_eq!(left.get(&key(1, 10)).unwrap().len(), 2);
    }

    #[test]
    fn test_key_subset() {
        let mut small = ChecksumIndex::new();
        small.insert(key(1, 10), PathBuf::from("/a/p"));
        small.insert(key(2, 20), PathBuf::from("/a/q"));

        let mut large = ChecksumIndex::new();
        large.insert(key(1, 10), PathBuf::from("/b/p"));
        large.insert(key(2, 20), PathBuf::from("/b/q"));
        large.insert(key(3, 30), PathBuf::from("/b/r"));

        assert!(small.is_key_subset_of(&large));
        assert!(!large.is_key_subset_of(&small));
    }

    #[test]
    fn test_from_records_skips_empty_files() {
        let records = vec![
            FileRecord {
                name: "a.txt".into(),
                size: 4,
                csum: 7,
                m_time: 0,
                dups: vec![],
            },
            FileRecord {
                name: "empty.txt".into(),
                size: 0,
                csum: 0,
                m_time: 0,
                dups: vec![],
            },
        ];
        let index = ChecksumIndex::from_records(&records, Path::new("/dir"));

        assert_eq!(index.len(), 1);
        assert_eq!(
            index.get(&key(7, 4)).unwrap().iter().next().unwrap(),
            &PathBuf::from("/dir/a.txt")
        );
    }
}
