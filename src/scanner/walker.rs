//! Directory walker: immediate-children listings and an iterative
//! whole-tree traversal.
//!
//! [`scan_dir`] lists exactly one level and classifies each entry as
//! directory, regular file, or symlink without following link targets. The
//! tool's own artifacts (scan record, its backup, and the summary) are
//! excluded from the file list so they are never checksummed.
//!
//! [`walk_tree`] drives every whole-tree pass in the crate. It is iterative
//! with an explicit frontier rather than recursive, so traversal depth is
//! bounded by heap, not by the call stack.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::{BACKUP_NAME, RECORD_NAME};
use crate::duplicates::summary::SUMMARY_NAME;

use super::ScanError;

/// The immediate children of one directory, classified by kind.
///
/// Symlinks are reported regardless of what they point at; they are never
/// listed under `dirs` or `files`.
#[derive(Debug, Default)]
pub struct Listing {
    /// Subdirectories (not symlinks to directories).
    pub dirs: Vec<PathBuf>,
    /// Regular files, excluding the tool's own artifact files.
    pub files: Vec<PathBuf>,
    /// Symbolic links of any target kind.
    pub symlinks: Vec<PathBuf>,
}

/// One directory in a tree traversal.
///
/// `parent` indexes into the traversal vector returned by [`walk_tree`];
/// the root carries `None`.
#[derive(Debug, Clone)]
pub struct DirNode {
    /// Absolute path of the directory.
    pub path: PathBuf,
    /// Index of the parent node in the traversal order.
    pub parent: Option<usize>,
}

/// True for filenames the tool writes itself.
fn is_own_artifact(name: &str) -> bool {
    name == RECORD_NAME || name == BACKUP_NAME || name == SUMMARY_NAME
}

/// List the immediate children of `path`.
///
/// Entries are classified by [`fs::symlink_metadata`]-style semantics: the
/// link itself is inspected, never its target. Children are sorted by name
/// for deterministic output.
///
/// # Errors
///
/// Returns [`ScanError::NotADirectory`] if `path` is not a directory, and
/// [`ScanError::Io`] for any underlying read failure.
pub fn scan_dir(path: &Path) -> Result<Listing, ScanError> {
    if !path.is_dir() {
        return Err(ScanError::NotADirectory(path.to_path_buf()));
    }

    let io_err = |source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut entries: Vec<fs::DirEntry> = fs::read_dir(path)
        .map_err(io_err)?
        .collect::<Result<_, _>>()
        .map_err(io_err)?;
    entries.sort_by_key(fs::DirEntry::file_name);

    let mut listing = Listing::default();
    for entry in entries {
        let file_type = entry.file_type().map_err(io_err)?;
        if file_type.is_symlink() {
            listing.symlinks.push(entry.path());
        } else if file_type.is_dir() {
            listing.dirs.push(entry.path());
        } else if file_type.is_file() {
            let name = entry.file_name();
            if is_own_artifact(&name.to_string_lossy()) {
                log::trace!("skipping artifact file: {}", entry.path().display());
            } else {
                listing.files.push(entry.path());
            }
        }
    }
    Ok(listing)
}

/// Enumerate every directory under `root` (inclusive), parents first.
///
/// The returned vector is ordered so that every node's parent precedes it;
/// iterating it in reverse therefore visits children before parents, which
/// is the order the record builder and the aggregator need.
///
/// # Errors
///
/// Fails with [`ScanError`] if any directory along the way cannot be read.
pub fn walk_tree(root: &Path) -> Result<Vec<DirNode>, ScanError> {
    let mut nodes = vec![DirNode {
        path: root.to_path_buf(),
        parent: None,
    }];

    let mut next = 0;
    while next < nodes.len() {
        let listing = scan_dir(&nodes[next].path)?;
        for dir in listing.dirs {
            nodes.push(DirNode {
                path: dir,
                parent: Some(next),
            });
        }
        next += 1;
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn touch(path: &Path, content: &str) {
        let mut f = File::create(path).unwrap();
        write!(f, "{content}").unwrap();
    }

    #[test]
    fn test_scan_dir_classifies_entries() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.txt"), "a");
        touch(&dir.path().join("b.txt"), "b");
        fs::create_dir(dir.path().join("sub")).unwrap();

        let listing = scan_dir(dir.path()).unwrap();
        assert_eq!(listing.files.len(), 2);
        assert_eq!(listing.dirs.len(), 1);
        assert!(listing.symlinks.is_empty());
    }

    #[test]
    fn test_scan_dir_excludes_artifacts() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.txt"), "a");
        touch(&dir.path().join(RECORD_NAME), "record");
        touch(&dir.path().join(BACKUP_NAME), "backup");
        touch(&dir.path().join(SUMMARY_NAME), "summary");

        let listing = scan_dir(dir.path()).unwrap();
        let names: Vec<_> = listing
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt"]);
    }

    #[test]
    fn test_scan_dir_does_not_list_subdir_contents() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        touch(&sub.join("nested.txt"), "nested");

        let listing = scan_dir(dir.path()).unwrap();
        assert!(listing.files.is_empty());
        assert_eq!(listing.dirs, vec![sub]);
    }

    #[test]
    #[cfg(unix)]
    fn test_scan_dir_reports_symlinks_without_following() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("target.txt"), "target");
        std::os::unix::fs::symlink(dir.path().join("target.txt"), dir.path().join("link.txt"))
            .unwrap();

        let listing = scan_dir(dir.path()).unwrap();
        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.symlinks.len(), 1);
    }

    #[test]
    fn test_scan_dir_rejects_file_path() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        touch(&file, "a");

        assert!(matches!(
            scan_dir(&file),
            Err(ScanError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_walk_tree_parents_precede_children() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        let nested = sub.join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir(dir.path().join("other")).unwrap();

        let nodes = walk_tree(dir.path()).unwrap();
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0].path, dir.path());
        assert!(nodes[0].parent.is_none());

        for (i, node) in nodes.iter().enumerate().skip(1) {
            let parent = node.parent.unwrap();
            assert!(parent < i);
            assert_eq!(nodes[parent].path, node.path.parent().unwrap());
        }
    }

    #[test]
    fn test_walk_tree_deep_nesting() {
        // Deep enough that a naive recursive walk would be at risk; the
        // iterative frontier should not care.
        let dir = TempDir::new().unwrap();
        let mut path = dir.path().to_path_buf();
        for i in 0..200 {
            path = path.join(format!("d{i}"));
        }
        fs::create_dir_all(&path).unwrap();

        let nodes = walk_tree(dir.path()).unwrap();
        assert_eq!(nodes.len(), 201);
    }
}
