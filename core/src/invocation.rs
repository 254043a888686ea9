//! Command-line synthesis from a command record and caller-supplied values.
//!
//! Placement is derived from each parameter's `position`, never from the
//! order parameters were parsed in: positional values come first in
//! ascending position order, followed by named values and switches in list
//! order.
//!
//! # Examples
//!
//! ```
//! use script_catalog_core::*;
//!
//! let mut record = CommandRecord::new("Get-Thing", "functions/Get-Thing.ps1");
//! record.parameters = vec![
//!     ParameterDeclaration::new("Verbose", ParameterType::Switch),
//!     ParameterDeclaration::new("Path", ParameterType::String).at_position(0),
//!     ParameterDeclaration::new("Name", ParameterType::String).mandatory().at_position(1),
//! ];
//!
//! let mut values = ValueMap::new();
//! values.insert("Path".into(), "y".into());
//! assert_eq!(missing_required(&record, &values), vec![2]);
//!
//! values.insert("Name".into(), "x".into());
//! values.insert("Verbose".into(), true.into());
//! assert!(missing_required(&record, &values).is_empty());
//! assert_eq!(synthesize_invocation(&record, &values), "Get-Thing 'y' 'x' -Verbose");
//! ```

use crate::types::{
    CommandRecord, ParameterDeclaration, ParameterType, ParameterValue, ValueMap, lookup_value,
};

/// Returns `true` when `value` satisfies `param`.
///
/// Switches need a truthy value; every other type needs non-blank text.
pub fn has_value(param: &ParameterDeclaration, value: Option<&ParameterValue>) -> bool {
    let Some(value) = value else {
        return false;
    };
    match param.declared_type {
        ParameterType::Switch => value.is_truthy(),
        _ => value.has_text(),
    }
}

/// Wraps `value` in single quotes, doubling embedded single quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Renders the value token for one parameter, without any `-Name` prefix.
///
/// Returns `None` when the parameter has no usable value or is a switch
/// (switches carry no value token).
pub fn render_value(param: &ParameterDeclaration, value: &ParameterValue) -> Option<String> {
    if param.declared_type == ParameterType::Switch || !has_value(param, Some(value)) {
        return None;
    }

    let token = match value {
        ParameterValue::Flag(flag) => quote_literal(&flag.to_string()),
        ParameterValue::Text(text) if param.declared_type.is_numeric() => text.clone(),
        ParameterValue::Text(text) => quote_literal(text),
    };
    Some(token)
}

/// Builds a runnable invocation string for `record` from `values`.
///
/// Parameters without a value are skipped. Positional parameters
/// (`position >= 0`) are emitted bare, in ascending position order with
/// collisions kept in list order; named parameters follow as `-Name value`
/// and present switches as bare `-Name` flags.
pub fn synthesize_invocation(record: &CommandRecord, values: &ValueMap) -> String {
    let mut positional: Vec<(i32, String)> = Vec::new();
    let mut named: Vec<String> = Vec::new();

    for param in &record.parameters {
        let value = lookup_value(values, &param.name);
        if !has_value(param, value) {
            continue;
        }

        if param.declared_type == ParameterType::Switch {
            named.push(format!("-{}", param.name));
            continue;
        }

        let Some(token) = value.and_then(|value| render_value(param, value)) else {
            continue;
        };
        if param.is_positional() {
            positional.push((param.position, token));
        } else {
            named.push(format!("-{} {token}", param.name));
        }
    }

    positional.sort_by_key(|(position, _)| *position);

    let base = if record.invocation.is_empty() {
        record.name.as_str()
    } else {
        record.invocation.as_str()
    };

    std::iter::once(base.to_string())
        .chain(positional.into_iter().map(|(_, token)| token))
        .chain(named)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the list indices of required parameters that lack a value.
pub fn missing_required(record: &CommandRecord, values: &ValueMap) -> Vec<usize> {
    record
        .parameters
        .iter()
        .enumerate()
        .filter(|(_, param)| {
            param.required && !has_value(param, lookup_value(values, &param.name))
        })
        .map(|(idx, _)| idx)
        .collect()
}
