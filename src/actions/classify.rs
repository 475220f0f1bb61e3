//! Primary/duplicate classification of a duplicate group.
//!
//! Each sort key is a pure `path -> u64` function; lower values are more
//! "primary". Paths are pre-sorted descending by lowercased path so that
//! equal keys break ties deterministically, then stable-sorted descending
//! by key, and the tail (lowest key) is popped off as primary.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use clap::ValueEnum;

/// The key value meaning "this path already counts as primary": the
/// neutral result of the list-based keys. When every non-primary path in a
/// group carries it, `include_all_ties` widens nothing.
pub const NEUTRAL_KEY: u64 = 1;

/// Everything a sort key may consult besides the path itself.
#[derive(Debug, Clone, Copy)]
pub struct SortContext<'a> {
    /// The scan root; `depth` counts directory levels below it.
    pub root: &'a Path,
    /// Configured "primary directories" names, consulted by `plist`.
    pub primary_dirs: &'a [String],
    /// Configured "duplicate directories" names, consulted by `dlist`.
    pub duplicate_dirs: &'a [String],
}

/// Policy for choosing which copy of a duplicate group is primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    /// Directory nesting depth below the scan root; shallower wins.
    Depth,
    /// 1 if any ancestor directory name is in the configured duplicate
    /// list, else 0; unlisted paths win.
    Dlist,
    /// 0 if any ancestor directory name is in the configured primary
    /// list, else 1; listed paths win.
    Plist,
    /// Character length of the filename; shorter wins.
    Length,
    /// Last-modified time; older wins.
    Date,
}

impl SortKey {
    /// Evaluate this key for `path`. Lower is more primary.
    #[must_use]
    pub fn value(self, path: &Path, ctx: &SortContext) -> u64 {
        match self {
            Self::Depth => {
                let relative = path.strip_prefix(ctx.root).unwrap_or(path);
                relative.components().count().saturating_sub(1) as u64
            }
            Self::Dlist => u64::from(ancestor_name_in(path, ctx.duplicate_dirs)),
            Self::Plist => u64::from(!ancestor_name_in(path, ctx.primary_dirs)),
            Self::Length => path
                .file_name()
                .map(|n| n.to_string_lossy().chars().count() as u64)
                .unwrap_or(0),
            Self::Date => match fs::metadata(path).and_then(|m| m.modified()) {
                Ok(modified) => modified
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0),
                Err(e) => {
                    // A path we cannot stat must never win primary status.
                    log::warn!("cannot stat {} for date key: {}", path.display(), e);
                    u64::MAX
                }
            },
        }
    }
}

/// Whether any directory component of `path` (the filename excluded)
/// matches one of `names`.
fn ancestor_name_in(path: &Path, names: &[String]) -> bool {
    let Some(parent) = path.parent() else {
        return false;
    };
    parent.components().any(|component| match component {
        Component::Normal(name) => {
            let name = name.to_string_lossy();
            names.iter().any(|n| n.as_str() == name)
        }
        _ => false,
    })
}

/// A duplicate group partitioned by policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    /// Copies to keep. Non-empty for any non-empty input group.
    pub primary: Vec<PathBuf>,
    /// Copies eligible for deletion.
    pub duplicates: Vec<PathBuf>,
}

/// Partition `paths` into primary and duplicate copies under `key`.
///
/// The path with the lowest `(key, lowercased path)` pair becomes primary.
/// With `include_all_ties`, further tail paths whose key equals the first
/// primary's are also kept, unless every remaining path carries
/// [`NEUTRAL_KEY`] (in which case widening would classify nothing).
#[must_use]
pub fn classify(
    paths: &[PathBuf],
    key: SortKey,
    include_all_ties: bool,
    ctx: &SortContext,
) -> Classified {
    let mut keyed: Vec<(u64, PathBuf)> = paths
        .iter()
        .map(|p| (key.value(p, ctx), p.clone()))
        .collect();
    keyed.sort_by(|a, b| {
        let a = a.1.to_string_lossy().to_lowercase();
        let b = b.1.to_string_lossy().to_lowercase();
        b.cmp(&a)
    });
    keyed.sort_by(|a, b| b.0.cmp(&a.0));

    let Some((primary_key, first)) = keyed.pop() else {
        return Classified::default();
    };
    let mut primary = vec![first];

    if include_all_ties && !keyed.iter().all(|(value, _)| *value == NEUTRAL_KEY) {
        while let Some((value, _)) = keyed.last() {
            if *value != primary_key {
                break;
            }
            if let Some((_, path)) = keyed.pop() {
                primary.push(path);
            }
        }
    }

    Classified {
        primary,
        duplicates: keyed.into_iter().map(|(_, path)| path).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(root: &'a Path, prim: &'a [String], dup: &'a [String]) -> SortContext<'a> {
        SortContext {
            root,
            primary_dirs: prim,
            duplicate_dirs: dup,
        }
    }

    fn paths(strs: &[&str]) -> Vec<PathBuf> {
        strs.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_depth_counts_levels_below_root() {
        let root = Path::new("/tree");
        let c = ctx(root, &[], &[]);
        assert_eq!(SortKey::Depth.value(Path::new("/tree/a.txt"), &c), 0);
        assert_eq!(SortKey::Depth.value(Path::new("/tree/sub/a.txt"), &c), 1);
        assert_eq!(SortKey::Depth.value(Path::new("/tree/sub/deep/a.txt"), &c), 2);
    }

    #[test]
    fn test_dlist_and_plist_consult_ancestor_names() {
        let root = Path::new("/tree");
        let prim = vec!["keep".to_string()];
        let dup = vec!["backup".to_string()];
        let c = ctx(root, &prim, &dup);

        assert_eq!(SortKey::Dlist.value(Path::new("/tree/backup/a.txt"), &c), 1);
        assert_eq!(SortKey::Dlist.value(Path::new("/tree/other/a.txt"), &c), 0);
        assert_eq!(SortKey::Plist.value(Path::new("/tree/keep/a.txt"), &c), 0);
        assert_eq!(SortKey::Plist.value(Path::new("/tree/other/a.txt"), &c), 1);
        // The filename itself is not an ancestor.
        assert_eq!(SortKey::Dlist.value(Path::new("/tree/x/backup"), &c), 0);
    }

    #[test]
    fn test_length_counts_filename_chars() {
        let c = ctx(Path::new("/"), &[], &[]);
        assert_eq!(SortKey::Length.value(Path::new("/dir/ab.txt"), &c), 6);
        assert_eq!(SortKey::Length.value(Path::new("/dir/abcd.txt"), &c), 8);
    }

    #[test]
    fn test_classify_partitions_whole_group() {
        let root = Path::new("/tree");
        let c = ctx(root, &[], &[]);
        let group = paths(&["/tree/sub/a.txt", "/tree/a.txt", "/tree/sub/deep/a.txt"]);

        let result = classify(&group, SortKey::Depth, false, &c);
        assert_eq!(result.primary, paths(&["/tree/a.txt"]));
        assert_eq!(result.primary.len() + result.duplicates.len(), group.len());
        for p in &group {
            assert!(result.primary.contains(p) ^ result.duplicates.contains(p));
        }
    }

    #[test]
    fn test_classify_tie_breaks_by_lowercase_path() {
        let root = Path::new("/");
        let c = ctx(root, &[], &[]);
        let group = paths(&["/b/y.txt", "/a/x.txt"]);

        let result = classify(&group, SortKey::Depth, false, &c);
        assert_eq!(result.primary, paths(&["/a/x.txt"]));
        assert_eq!(result.duplicates, paths(&["/b/y.txt"]));
    }

    #[test]
    fn test_classify_include_all_ties_widens_primary() {
        let root = Path::new("/tree");
        let prim = vec!["keep".to_string()];
        let c = ctx(root, &prim, &[]);
        let group = paths(&[
            "/tree/keep/a.txt",
            "/tree/keep/b.txt",
            "/tree/other/a.txt",
        ]);

        let narrow = classify(&group, SortKey::Plist, false, &c);
        assert_eq!(narrow.primary.len(), 1);
        assert_eq!(narrow.duplicates.len(), 2);

        let wide = classify(&group, SortKey::Plist, true, &c);
        assert_eq!(wide.primary.len(), 2);
        assert_eq!(wide.duplicates, paths(&["/tree/other/a.txt"]));
    }

    #[test]
    fn test_classify_all_neutral_does_not_widen() {
        let root = Path::new("/tree");
        let prim = vec!["keep".to_string()];
        let c = ctx(root, &prim, &[]);
        // Nothing under "keep": everyone carries the neutral value 1.
        let group = paths(&["/tree/x/a.txt", "/tree/y/a.txt", "/tree/z/a.txt"]);

        let result = classify(&group, SortKey::Plist, true, &c);
        assert_eq!(result.primary.len(), 1);
        assert_eq!(result.duplicates.len(), 2);
    }

    #[test]
    fn test_classify_empty_group() {
        let c = ctx(Path::new("/"), &[], &[]);
        let result = classify(&[], SortKey::Depth, false, &c);
        assert!(result.primary.is_empty());
        assert!(result.duplicates.is_empty());
    }
}
