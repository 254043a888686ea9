//! Reconciliation of help-derived and block-derived parameters.

use std::collections::HashMap;

use regex::Regex;
use script_catalog_core::{ParameterDeclaration, ParameterType};
use tracing::debug;

/// Merges block-parsed parameters with `.PARAMETER` name hints.
///
/// Block entries seed the result keyed by lower-cased name; a later entry
/// with the same name replaces the earlier one in place. A hint that is not
/// already present is added as an optional, non-positional `String`
/// parameter only when `source` actually references `$hint`; otherwise it is
/// dropped. The result is stable-sorted by position.
pub fn reconcile_parameters(
    declared: Vec<ParameterDeclaration>,
    hints: &[String],
    source: &str,
) -> Vec<ParameterDeclaration> {
    let mut merged: Vec<ParameterDeclaration> = Vec::with_capacity(declared.len());
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for param in declared {
        let key = param.name.to_ascii_lowercase();
        match index_by_key.get(&key) {
            Some(&idx) => merged[idx] = param,
            None => {
                index_by_key.insert(key, merged.len());
                merged.push(param);
            }
        }
    }

    for hint in hints {
        let key = hint.to_ascii_lowercase();
        if index_by_key.contains_key(&key) {
            continue;
        }
        if !references_variable(source, hint) {
            debug!(hint = %hint, "Dropping help-only parameter without a bound variable");
            continue;
        }
        index_by_key.insert(key, merged.len());
        merged.push(ParameterDeclaration::new(hint, ParameterType::String));
    }

    merged.sort_by_key(|param| param.position);
    merged
}

/// Returns `true` when `source` contains `$name` as a whole variable token
/// (case-insensitive).
fn references_variable(source: &str, name: &str) -> bool {
    let pattern = format!(r"(?i)\${}\b", regex::escape(name));
    Regex::new(&pattern).is_ok_and(|re| re.is_match(source))
}
