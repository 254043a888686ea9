//! Catalog configuration.
//!
//! Controls how categories are derived from a script's location. Loaded from
//! YAML; every field is optional and falls back to the defaults below.
//!
//! # Example YAML
//!
//! ```yaml
//! base_path: functions
//! category_depth: 2
//! prefer_folder: true
//! ignore:
//!   - scripts
//!   - src
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Smallest number of folder segments a category may use.
pub const MIN_CATEGORY_DEPTH: usize = 1;
/// Largest number of folder segments a category may use.
pub const MAX_CATEGORY_DEPTH: usize = 5;

/// Folder names that carry no category meaning.
pub const DEFAULT_IGNORE: &[&str] = &[
    "functions",
    "function",
    "scripts",
    "script",
    "src",
    "source",
    "powershell",
    "pwsh",
    "ps",
    "bin",
    "build",
    ".github",
    ".vscode",
    "lib",
    "modules",
    "module",
    "samples",
    "examples",
    "test",
    "tests",
    "docs",
    "documentation",
];

/// Settings for category derivation.
///
/// # Examples
///
/// ```
/// use script_catalog_discovery::config::CatalogConfig;
///
/// let config = CatalogConfig::new("./functions/", 9, vec!["Tools".into()], false);
/// assert_eq!(config.base_path, "functions");
/// assert_eq!(config.category_depth, 5);
/// assert!(config.is_ignored("tools"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path prefix that script paths are relative to.
    pub base_path: String,
    /// Folder names skipped when building a category (case-insensitive).
    pub ignore: Vec<String>,
    /// Number of leading folder segments used for a category.
    pub category_depth: usize,
    /// Prefer the folder-derived category over the pattern table.
    pub prefer_folder: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_path: "functions".to_string(),
            ignore: DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
            category_depth: 2,
            prefer_folder: true,
        }
    }
}

impl CatalogConfig {
    /// Creates a normalized configuration.
    pub fn new(
        base_path: &str,
        category_depth: usize,
        ignore: Vec<String>,
        prefer_folder: bool,
    ) -> Self {
        Self {
            base_path: base_path.to_string(),
            ignore,
            category_depth,
            prefer_folder,
        }
        .normalized()
    }

    /// Clamps the depth, cleans up the base path and drops blank ignore
    /// entries.
    pub fn normalized(mut self) -> Self {
        self.category_depth = self
            .category_depth
            .clamp(MIN_CATEGORY_DEPTH, MAX_CATEGORY_DEPTH);
        self.base_path = normalize_base_path(&self.base_path);
        self.ignore = self
            .ignore
            .into_iter()
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect();
        self
    }

    /// Returns `true` if `segment` is in the ignore list.
    pub fn is_ignored(&self, segment: &str) -> bool {
        self.ignore
            .iter()
            .any(|entry| entry.eq_ignore_ascii_case(segment))
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`](crate::CatalogError::Io) if the
    /// file cannot be read, or
    /// [`CatalogError::Yaml`](crate::CatalogError::Yaml) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        Ok(config.normalized())
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}

/// Converts backslashes to `/` and strips a leading `./` and surrounding
/// slashes.
pub fn normalize_base_path(raw: &str) -> String {
    let path = raw.trim().replace('\\', "/");
    let path = path.trim_start_matches("./");
    path.trim_matches('/').to_string()
}
