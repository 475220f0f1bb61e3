//! Sorting configuration.
//!
//! The `plist` and `dlist` sort keys consult two operator-maintained lists
//! of directory names. They come from a `dupecache.toml` in the scan root,
//! or from the platform config directory when the root has none:
//!
//! ```toml
//! [sorting]
//! primary_directories = ["originals", "keep"]
//! duplicate_directories = ["backup", "old"]
//! ```
//!
//! No config file at all means empty lists; a file that exists but cannot
//! be parsed is an error rather than silently ignored policy.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Filename looked up in the scan root and in the platform config dir.
pub const CONFIG_NAME: &str = "dupecache.toml";

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// The `[sorting]` section.
    #[serde(default)]
    pub sorting: Sorting,
}

/// Directory-name lists consumed by the list-based sort keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sorting {
    /// Names marking a directory's files as preferred primaries.
    #[serde(default)]
    pub primary_directories: Vec<String>,
    /// Names marking a directory's files as preferred duplicates.
    #[serde(default)]
    pub duplicate_directories: Vec<String>,
}

impl Config {
    /// Load configuration for a scan rooted at `root`.
    ///
    /// A `dupecache.toml` in the root wins; otherwise the platform config
    /// directory is consulted; otherwise defaults.
    ///
    /// # Errors
    ///
    /// Fails if a config file exists but cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self> {
        let local = root.join(CONFIG_NAME);
        if local.is_file() {
            return Self::parse(&local);
        }
        if let Some(fallback) = Self::fallback_path() {
            if fallback.is_file() {
                return Self::parse(&fallback);
            }
        }
        log::debug!("no config file found, using empty sorting lists");
        Ok(Self::default())
    }

    fn parse(path: &Path) -> Result<Self> {
        log::debug!("reading config file at {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Platform-specific fallback config path, when one can be determined.
    fn fallback_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupecache").map(|dirs| dirs.config_dir().join(CONFIG_NAME))
    }
}
