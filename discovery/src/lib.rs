//! Offline command metadata extraction for script files.
//!
//! This crate turns the raw text of a script file into a
//! [`CommandRecord`]: the command name, its documentation sections, an
//! ordered parameter list and a display category. Nothing is executed; the
//! text is only scanned.
//!
//! # Main entry points
//!
//! - [`parse_command`]: the full per-file pipeline (help block, parameter
//!   block, reconciliation, category).
//! - [`parser::parse_help_block`] and [`parser::parse_param_block`]: the
//!   two source parsers on their own.
//! - [`category::derive_category`]: folder- and pattern-based category.
//! - [`discover::build_catalog`]: parse every script under a directory in
//!   parallel and group the results.
//!
//! # Example
//!
//! ```
//! use script_catalog_discovery::{config::CatalogConfig, parse_command};
//!
//! let text = r#"
//! <#
//! .SYNOPSIS
//!   Pings a host.
//! .PARAMETER Host
//!   Target host name.
//! #>
//! function Test-Ping {
//!     param(
//!         [Parameter(Mandatory = $true, Position = 0)][string]$Host,
//!         [int]$Count = 4
//!     )
//! }
//! "#;
//!
//! let config = CatalogConfig::default();
//! let record = parse_command(&config, text, "functions/Net/Test-Ping.ps1").unwrap();
//! assert_eq!(record.name, "Test-Ping");
//! assert_eq!(record.category, "Net");
//! assert_eq!(record.synopsis, "Pings a host.");
//! assert_eq!(record.parameters.len(), 2);
//! ```
//!
//! # Crate type
//!
//! This is a library crate. The `script-catalog` binary in the
//! `script-catalog-cli` crate is the command-line front end.
//!
//! [`CommandRecord`]: script_catalog_core::CommandRecord

pub mod category;
pub mod config;
pub mod discover;
pub mod error;
pub mod output;
pub mod parser;

use std::sync::LazyLock;

use regex::Regex;
use script_catalog_core::CommandRecord;
use tracing::debug;

use config::CatalogConfig;
use parser::scanner::is_code_at;

pub use error::{CatalogError, Result};

/// Only function declarations starting within this many bytes name the
/// command.
pub const FUNCTION_SEARCH_WINDOW: usize = 2000;

static FUNCTION_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfunction\s+([A-Za-z0-9_-]+)").expect("static regex must compile")
});

/// Derives the command name of a script.
///
/// Uses the first `function <Name>` declaration that starts in the leading
/// [`FUNCTION_SEARCH_WINDOW`] bytes outside comments and string literals.
/// Otherwise falls back to the file name of `fallback_path` without its
/// `.ps1` extension. Returns `None` when both are empty.
///
/// # Examples
///
/// ```
/// use script_catalog_discovery::derive_command_name;
///
/// assert_eq!(
///     derive_command_name("function Get-Thing { }", "x.ps1").as_deref(),
///     Some("Get-Thing")
/// );
/// assert_eq!(
///     derive_command_name("Write-Host hi", "tools\\Invoke-Job.PS1").as_deref(),
///     Some("Invoke-Job")
/// );
/// assert_eq!(derive_command_name("", ""), None);
/// ```
pub fn derive_command_name(text: &str, fallback_path: &str) -> Option<String> {
    let declared = FUNCTION_NAME_RE
        .captures_iter(text)
        .take_while(|caps| caps.get(0).is_some_and(|m| m.start() < FUNCTION_SEARCH_WINDOW))
        .find(|caps| caps.get(0).is_some_and(|m| is_code_at(text, m.start())))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    declared
        .or_else(|| file_stem(fallback_path))
        .filter(|name| !name.is_empty())
}

/// Returns the file name of `path` with a trailing `.ps1` removed.
fn file_stem(path: &str) -> Option<String> {
    let file_name = path.rsplit(['/', '\\']).next()?.trim();
    let has_extension = file_name.len() >= 4
        && file_name.is_char_boundary(file_name.len() - 4)
        && file_name[file_name.len() - 4..].eq_ignore_ascii_case(".ps1");
    let stem = if has_extension {
        &file_name[..file_name.len() - 4]
    } else {
        file_name
    };
    Some(stem.to_string())
}

/// Parses one script into a command record.
///
/// Composes the help-block parser, the parameter-block parser, parameter
/// reconciliation and category derivation. `path` is the logical path of the
/// file and is stored verbatim on the record. Returns `None` only when no
/// command name can be derived.
pub fn parse_command(config: &CatalogConfig, text: &str, path: &str) -> Option<CommandRecord> {
    let Some(name) = derive_command_name(text, path) else {
        debug!(path, "No command name, skipping");
        return None;
    };

    let help = parser::parse_help_block(text);
    let declared = parser::parse_param_block(text);
    let parameters = parser::reconcile_parameters(declared, &help.parameter_name_hints, text);

    let mut record = CommandRecord::new(&name, path);
    record.category = category::derive_category(config, path, Some(text));
    record.synopsis = help.synopsis;
    record.description = help.description;
    record.examples = help.examples;
    record.parameters = parameters;

    debug!(
        path,
        command = %record.name,
        parameters = record.parameters.len(),
        examples = record.examples.len(),
        "Parsed script"
    );
    Some(record)
}
