//! Deletion of classified duplicate copies.
//!
//! A path that disappeared between listing and deletion is a warning, not
//! an abort: the rest of the set is still processed. Everything else is
//! fatal, since silently skipping an undeletable file would leave the
//! operator believing space was reclaimed.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Tally of one deletion pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteOutcome {
    /// Paths actually removed.
    pub deleted: usize,
    /// Paths already missing when deletion was attempted.
    pub missing: usize,
    /// Bytes freed by the removed paths.
    pub bytes_freed: u64,
}

impl DeleteOutcome {
    /// Fold another outcome into this one.
    pub fn absorb(&mut self, other: DeleteOutcome) {
        self.deleted += other.deleted;
        self.missing += other.missing;
        self.bytes_freed += other.bytes_freed;
    }
}

/// Remove every path in `paths`, permanently or via the system trash.
///
/// # Errors
///
/// Fails on any error other than a path being already missing.
pub fn delete_duplicates(paths: &[PathBuf], use_trash: bool) -> Result<DeleteOutcome> {
    let mut outcome = DeleteOutcome::default();
    for path in paths {
        match delete_one(path, use_trash)? {
            Some(size) => {
                outcome.deleted += 1;
                outcome.bytes_freed += size;
            }
            None => outcome.missing += 1,
        }
    }
    Ok(outcome)
}

/// Delete one path. `Ok(Some(size))` on success, `Ok(None)` when the path
/// was already gone.
fn delete_one(path: &Path, use_trash: bool) -> Result<Option<u64>> {
    let size = match fs::symlink_metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::warn!("deletion warning: could not find {}", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(source)
                .with_context(|| format!("failed to stat {} before deletion", path.display()));
        }
    };

    if use_trash {
        if let Err(source) = trash::delete(path) {
            // The file may have vanished between the stat above and the
            // trash call; that race stays a warning like the direct path.
            if matches!(fs::symlink_metadata(path), Err(e) if e.kind() == ErrorKind::NotFound) {
                log::warn!("deletion warning: could not find {}", path.display());
                return Ok(None);
            }
            return Err(source)
                .with_context(|| format!("failed to move {} to trash", path.display()));
        }
    } else {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("deletion warning: could not find {}", path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(source)
                    .with_context(|| format!("failed to delete {}", path.display()));
            }
        }
    }
    log::debug!("deleted {}", path.display());
    Ok(Some(size))
}
