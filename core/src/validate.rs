//! Record and catalog validation.
//!
//! Validates structural invariants of command records and catalog packages,
//! catching errors such as duplicate parameter names, empty names, and
//! parameter lists that are out of position order before they reach a
//! front end.
//!
//! # Examples
//!
//! ```
//! use script_catalog_core::*;
//!
//! let mut record = CommandRecord::new("Get-Thing", "Get-Thing.ps1");
//! record.parameters.push(ParameterDeclaration::new("Name", ParameterType::String));
//! assert!(validate_record(&record).is_empty());
//!
//! // Invalid: the same parameter twice, differing only in case
//! record.parameters.push(ParameterDeclaration::new("name", ParameterType::String));
//! assert!(!validate_record(&record).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{CatalogPackage, CommandRecord};

/// Record/catalog validation errors.
///
/// Each variant describes a specific structural problem found during
/// validation. The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Package version string is empty.
    #[error("package version cannot be empty")]
    EmptyPackageVersion,
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// Two records in the same category share a command name.
    #[error("duplicate command in category {category}: {command}")]
    DuplicateCommand { category: String, command: String },
    /// A parameter has an empty name.
    #[error("parameter name cannot be empty in command: {0}")]
    EmptyParameterName(String),
    /// Two parameters of one command share a name (case-insensitive).
    #[error("duplicate parameter in command {command}: {parameter}")]
    DuplicateParameter { command: String, parameter: String },
    /// Parameters are not sorted ascending by position.
    #[error("parameters of command {0} are not ordered by position")]
    UnorderedParameters(String),
}

/// Validates a catalog package.
///
/// Checks for an empty version string, duplicate command names within one
/// category, and validates each record individually.
///
/// # Examples
///
/// ```
/// use script_catalog_core::*;
///
/// let mut package = CatalogPackage::new("1.0.0", "2026-01-01T00:00:00Z");
/// package.groups = group_by_category(vec![
///     CommandRecord::new("Get-Thing", "a/Get-Thing.ps1"),
///     CommandRecord::new("Get-Thing", "b/Get-Thing.ps1"),
/// ]);
/// let errors = validate_package(&package);
/// assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateCommand { .. })));
/// ```
pub fn validate_package(package: &CatalogPackage) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if package.version.trim().is_empty() {
        errors.push(ValidationError::EmptyPackageVersion);
        return errors;
    }

    for group in &package.groups {
        let mut seen: HashSet<String> = HashSet::new();
        for record in &group.commands {
            if !seen.insert(record.name.to_ascii_lowercase()) {
                errors.push(ValidationError::DuplicateCommand {
                    category: group.category.clone(),
                    command: record.name.clone(),
                });
            }
            errors.extend(validate_record(record));
        }
    }

    errors
}

/// Validates a single command record.
///
/// Checks for an empty command name, empty or duplicate parameter names, and
/// parameters out of position order.
pub fn validate_record(record: &CommandRecord) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if record.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName);
        return errors;
    }

    let mut seen = HashSet::new();
    for param in &record.parameters {
        if param.name.trim().is_empty() {
            errors.push(ValidationError::EmptyParameterName(record.name.clone()));
            continue;
        }
        if !seen.insert(param.name.to_ascii_lowercase()) {
            errors.push(ValidationError::DuplicateParameter {
                command: record.name.clone(),
                parameter: param.name.clone(),
            });
        }
    }

    if record
        .parameters
        .windows(2)
        .any(|pair| pair[0].position > pair[1].position)
    {
        errors.push(ValidationError::UnorderedParameters(record.name.clone()));
    }

    errors
}
