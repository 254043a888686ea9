//! Local script discovery and parallel catalog building.

use std::fs;
use std::path::Path;

use chrono::Utc;
use rayon::prelude::*;
use script_catalog_core::{CatalogPackage, CommandRecord, group_by_category};
use tracing::{info, warn};

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::parse_command;

/// File extension of script sources (matched case-insensitively).
pub const SCRIPT_EXTENSION: &str = "ps1";

/// Aggregated output from one catalog build.
#[derive(Debug, Clone)]
pub struct CatalogOutcome {
    /// Package containing every parsed command, grouped by category.
    pub package: CatalogPackage,
    /// Relative paths of files that could not be read or named no command.
    pub skipped: Vec<String>,
}

/// Recursively lists script files under `root`.
///
/// Paths are relative to `root`, use `/` separators and are sorted.
/// Subdirectories that cannot be read are logged and skipped.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidInput`] if `root` is not a directory and
/// [`CatalogError::Io`] if it cannot be read.
pub fn discover_scripts(root: impl AsRef<Path>) -> Result<Vec<String>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(CatalogError::InvalidInput(format!(
            "Script root '{}' is not a directory",
            root.display()
        )));
    }

    let mut scripts = Vec::new();
    let mut pending = vec![String::new()];

    while let Some(relative) = pending.pop() {
        let dir = if relative.is_empty() {
            root.to_path_buf()
        } else {
            root.join(&relative)
        };

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if relative.is_empty() => return Err(err.into()),
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "Skipping unreadable directory");
                continue;
            }
        };

        for entry in entries.flatten() {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                warn!(path = %entry.path().display(), "Skipping non-UTF-8 path");
                continue;
            };
            let child = if relative.is_empty() {
                name
            } else {
                format!("{relative}/{name}")
            };

            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                pending.push(child);
            } else if is_script(&child) {
                scripts.push(child);
            }
        }
    }

    scripts.sort();
    Ok(scripts)
}

/// Returns `true` when `path` ends in the script extension.
pub fn is_script(path: &str) -> bool {
    path.rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(SCRIPT_EXTENSION))
}

/// Parses every script under `root` into a grouped catalog.
///
/// Files are parsed in parallel on a pool of `jobs` threads (`None` or `0`
/// picks an adaptive default). Each record's path is the file's path
/// relative to `root`. Results are sorted before grouping, so the output
/// does not depend on scheduling.
pub fn build_catalog(
    config: &CatalogConfig,
    root: impl AsRef<Path>,
    jobs: Option<usize>,
    version: &str,
) -> Result<CatalogOutcome> {
    let root = root.as_ref();
    let scripts = discover_scripts(root)?;

    let parse_one = |relative: &String| -> (String, Option<CommandRecord>) {
        let text = match fs::read_to_string(root.join(relative)) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %relative, error = %err, "Skipping unreadable script");
                return (relative.clone(), None);
            }
        };
        (relative.clone(), parse_command(config, &text, relative))
    };

    let jobs = jobs
        .filter(|jobs| *jobs > 0)
        .unwrap_or_else(|| default_parallel_jobs(scripts.len()));
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|err| CatalogError::InvalidInput(format!("failed to build thread pool: {err}")))?;

    let mut results: Vec<(String, Option<CommandRecord>)> =
        pool.install(|| scripts.par_iter().map(parse_one).collect());
    results.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut records = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();
    for (path, record) in results {
        match record {
            Some(record) => records.push(record),
            None => skipped.push(path),
        }
    }

    info!(
        root = %root.display(),
        commands = records.len(),
        skipped = skipped.len(),
        jobs,
        "Built script catalog"
    );

    let mut package = CatalogPackage::new(version, Utc::now().to_rfc3339());
    package.groups = group_by_category(records);

    Ok(CatalogOutcome { package, skipped })
}

fn default_parallel_jobs(file_count: usize) -> usize {
    let cpu_count = std::thread::available_parallelism()
        .map(|parallelism| parallelism.get())
        .unwrap_or(4);
    cpu_count.min(12).max(1).min(file_count.max(1))
}
