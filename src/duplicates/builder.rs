//! Build pass: materialize a current scan record for every directory.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::cache::{FileRecord, RecordStore};
use crate::scanner::{scan_dir, walk_tree, Listing};

/// Cache-reuse strategy for one build invocation, applied uniformly
/// across the whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RescanMode {
    /// Reuse any existing record verbatim; only directories without a
    /// record get scanned.
    #[default]
    None,
    /// Reuse cached rows matched by file name; scan everything else.
    Light,
    /// Recompute every file from scratch.
    Full,
}

/// Walks the tree and brings every directory's scan record up to date.
#[derive(Debug)]
pub struct RecordBuilder<'a> {
    store: &'a RecordStore,
    mode: RescanMode,
}

impl<'a> RecordBuilder<'a> {
    /// Create a builder using `store` for persistence.
    #[must_use]
    pub fn new(store: &'a RecordStore, mode: RescanMode) -> Self {
        Self { store, mode }
    }

    /// Build or refresh records for `root` and every directory below it,
    /// children before parents. Returns the number of directories visited.
    ///
    /// # Errors
    ///
    /// Fails on the first traversal, checksum, or store error; a checksum
    /// failure must abort the run because a partial identity cannot be
    /// cached safely.
    pub fn build(&self, root: &Path) -> Result<usize> {
        let nodes = walk_tree(root)
            .with_context(|| format!("failed to walk tree at {}", root.display()))?;

        for node in nodes.iter().rev() {
            self.build_dir(&node.path)?;
        }
        Ok(nodes.len())
    }

    /// Build or refresh one directory's record from its direct files.
    fn build_dir(&self, dir: &Path) -> Result<()> {
        let listing =
            scan_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;

        let had_record = self.store.exists(dir);
        let mut records = if had_record {
            match self.mode {
                RescanMode::None => {
                    log::debug!("record found for {}, using previous results", dir.display());
                    return Ok(());
                }
                RescanMode::Light => self.light_records(dir, &listing)?,
                RescanMode::Full => self.fresh_records(dir, &listing)?,
            }
        } else {
            self.fresh_records(dir, &listing)?
        };

        // Only a full rescan keeps the prior generation around; a light
        // rescan supersedes it in place.
        if had_record && self.mode == RescanMode::Full {
            self.store
                .rotate_backup(dir)
                .with_context(|| format!("failed to back up record in {}", dir.display()))?;
        }

        records.sort_by_key(|r| r.size);
        self.store
            .save(dir, &records)
            .with_context(|| format!("failed to save record in {}", dir.display()))?;
        Ok(())
    }

    /// Checksum every direct file of `dir`.
    fn fresh_records(&self, dir: &Path, listing: &Listing) -> Result<Vec<FileRecord>> {
        log::info!(
            "building record for {} ({} files)",
            dir.display(),
            listing.files.len()
        );
        listing
            .files
            .iter()
            .map(|file| {
                FileRecord::scan(file)
                    .with_context(|| format!("failed to scan {}", file.display()))
            })
            .collect()
    }

    /// Reuse rows from the prior record where the file name still matches;
    /// scan only the rest. A renamed file never matches and always gets
    /// fresh data.
    fn light_records(&self, dir: &Path, listing: &Listing) -> Result<Vec<FileRecord>> {
        let cached = self
            .store
            .load_name_index(dir)
            .with_context(|| format!("failed to load prior record in {}", dir.display()))?;

        listing
            .files
            .iter()
            .map(|file| {
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                match cached.get(&name) {
                    Some(meta) => Ok(FileRecord::from_cached(name, *meta)),
                    None => {
                        log::info!("no cached entry for {}", file.display());
                        FileRecord::scan(file)
                            .with_context(|| format!("failed to scan {}", file.display()))
                    }
                }
            })
            .collect()
    }
}
