//! Core record types and invocation synthesis for script command catalogs.
//!
//! This crate defines the foundational types for describing commands found
//! in script source files:
//!
//! - [`CommandRecord`]: one command with its documentation, category and
//!   ordered parameter list.
//! - [`ParameterDeclaration`]: a formal parameter with its declared type,
//!   mandatory flag and position.
//! - [`HelpBlock`]: the documentation sections of a script.
//! - [`CatalogPackage`]: a versioned bundle of records grouped by category.
//!
//! Synthesis ([`synthesize_invocation`], [`missing_required`]) turns a record
//! plus caller-supplied values into a runnable command line.
//!
//! Validation ([`validate_record`], [`validate_package`]) catches structural
//! errors such as duplicate parameter names and unordered parameter lists.
//!
//! # Example
//!
//! ```
//! use script_catalog_core::*;
//!
//! let mut record = CommandRecord::new("Test-Ping", "functions/net/Test-Ping.ps1");
//! record.parameters = vec![
//!     ParameterDeclaration::new("Host", ParameterType::String).mandatory().at_position(0),
//!     ParameterDeclaration::new("Count", ParameterType::Int32).at_position(1),
//! ];
//!
//! let mut values = ValueMap::new();
//! values.insert("Host".into(), "example.com".into());
//! values.insert("Count".into(), "3".into());
//!
//! assert!(validate_record(&record).is_empty());
//! assert_eq!(synthesize_invocation(&record, &values), "Test-Ping 'example.com' 3");
//! ```

mod invocation;
mod package;
mod types;
mod validate;

pub use invocation::{
    has_value, missing_required, quote_literal, render_value, synthesize_invocation,
};
pub use package::{CatalogPackage, CategoryGroup, group_by_category};
pub use types::*;
pub use validate::{ValidationError, validate_package, validate_record};
