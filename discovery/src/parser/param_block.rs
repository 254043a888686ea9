//! Parameter declaration block parsing.
//!
//! Locates the first `param( ... )` list outside comments, splits it into
//! one chunk per declared parameter and reads the attribute head of each
//! chunk (`[Parameter(...)]`, validation attributes, the type literal) up to
//! the bound `$Name`.

use std::sync::LazyLock;

use regex::Regex;
use script_catalog_core::{ParameterDeclaration, ParameterType};
use tracing::debug;

use super::scanner::{
    Scanner, bracket_groups, find_balanced_close, is_code_at, split_top_level, strip_comments,
};

static PARAM_OPENER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bparam\s*\(").expect("static regex must compile"));
static VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("static regex must compile")
});
static PARAMETER_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^parameter\s*\(").expect("static regex must compile"));
static ATTRIBUTE_CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.]*\s*\(").expect("static regex must compile")
});
static MANDATORY_ASSIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bmandatory\s*=\s*\$?(true|false)\b").expect("static regex must compile")
});
static MANDATORY_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmandatory\b").expect("static regex must compile"));
static POSITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bposition\s*=\s*(-?\d+)").expect("static regex must compile")
});
static INT_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)int(16|32|64)?").expect("static regex must compile"));

/// Returns `true` for automatic variables that never name a parameter.
fn is_special_variable(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "true" | "false" | "null" | "env" | "_" | "psitem"
    )
}

/// Parses the first parameter block of `text`.
///
/// Returns one declaration per top-level entry that binds a variable, in
/// declaration order. A missing or unbalanced block yields an empty list.
pub fn parse_param_block(text: &str) -> Vec<ParameterDeclaration> {
    let Some(opener) = PARAM_OPENER_RE
        .find_iter(text)
        .find(|m| is_code_at(text, m.start()))
    else {
        return Vec::new();
    };

    let open_index = opener.end() - 1;
    let Some(close_index) = find_balanced_close(text, open_index) else {
        debug!(offset = open_index, "Unbalanced parameter block, skipping");
        return Vec::new();
    };

    let block = &text[open_index + 1..close_index];
    split_top_level(block, ',')
        .into_iter()
        .filter_map(parse_param_chunk)
        .collect()
}

/// Parses one comma-separated entry of a parameter block.
///
/// Returns `None` when the chunk binds no variable.
pub fn parse_param_chunk(chunk: &str) -> Option<ParameterDeclaration> {
    let code = strip_comments(chunk);
    let (name_start, name) = bound_variable(&code)?;
    let head = &code[..name_start];

    let mut param = ParameterDeclaration::new(name, ParameterType::Object);
    let mut declared_type = "";

    for group in bracket_groups(head) {
        let group = group.trim();
        if PARAMETER_ATTR_RE.is_match(group) {
            apply_parameter_attribute(&mut param, group);
        } else if !ATTRIBUTE_CALL_RE.is_match(group) {
            declared_type = group;
        }
    }

    param.declared_type = normalize_type(declared_type);
    Some(param)
}

/// Finds the bound variable of a chunk: the first non-special `$name` at the
/// top level of the chunk, or failing that the first one anywhere.
///
/// Variables nested inside attribute arguments, such as the `$x` in
/// `[ValidateScript({ $x -gt 0 })][int]$Count`, are passed over in favor of
/// the top-level `$Count` rather than taking the first `$name` in the text.
fn bound_variable(code: &str) -> Option<(usize, &str)> {
    let candidates = VARIABLE_RE
        .captures_iter(code)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str();
            (!is_special_variable(name)).then_some((whole.start(), name))
        })
        .collect::<Vec<_>>();

    let top_level = Scanner::new(code)
        .filter(|token| token.is_top_level() && token.ch == '$')
        .map(|token| token.index)
        .collect::<Vec<_>>();

    candidates
        .iter()
        .find(|(start, _)| top_level.contains(start))
        .or_else(|| candidates.first())
        .copied()
}

/// Reads `Mandatory` and `Position` out of a `Parameter(...)` attribute.
fn apply_parameter_attribute(param: &mut ParameterDeclaration, group: &str) {
    let body = match (group.find('('), group.rfind(')')) {
        (Some(open), Some(close)) if close > open => &group[open + 1..close],
        (Some(open), _) => &group[open + 1..],
        _ => "",
    };

    if let Some(caps) = MANDATORY_ASSIGN_RE.captures(body) {
        param.required = caps[1].eq_ignore_ascii_case("true");
    } else if MANDATORY_WORD_RE.is_match(body) {
        param.required = true;
    }

    if let Some(position) = POSITION_RE
        .captures(body)
        .and_then(|caps| caps[1].parse::<i32>().ok())
    {
        param.position = position;
    }
}

/// Folds declared type text onto the semantic type set.
///
/// Matching is by substring, checked in order: switch, bool, int, string.
/// Unmatched text is kept verbatim; empty text is [`ParameterType::Object`].
pub fn normalize_type(declared: &str) -> ParameterType {
    let declared = declared.trim();
    let lower = declared.to_ascii_lowercase();

    if lower.contains("switch") {
        ParameterType::Switch
    } else if lower.contains("bool") {
        ParameterType::Boolean
    } else if INT_TYPE_RE.is_match(declared) {
        ParameterType::Int32
    } else if lower.contains("string") {
        ParameterType::String
    } else if declared.is_empty() {
        ParameterType::Object
    } else {
        ParameterType::Other(declared.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_attribute_round_trip() {
        let params = parse_param_block(
            "function Get-Thing { param([Parameter(Mandatory=$true, Position=0)][string]$Name) }",
        );
        assert_eq!(
            params,
            vec![ParameterDeclaration::new("Name", ParameterType::String)
                .mandatory()
                .at_position(0)]
        );
    }

    #[test]
    fn test_bare_mandatory_and_explicit_false() {
        let params = parse_param_block(
            "param(\n  [Parameter(Mandatory)][int]$Count,\n  [Parameter(Mandatory = $false)][switch]$Force\n)",
        );
        assert_eq!(params.len(), 2);
        assert!(params[0].required);
        assert_eq!(params[0].declared_type, ParameterType::Int32);
        assert!(!params[1].required);
        assert_eq!(params[1].declared_type, ParameterType::Switch);
    }

    #[test]
    fn test_negative_position_is_kept() {
        let param = parse_param_chunk("[Parameter(Position = -3)]$Offset").unwrap();
        assert_eq!(param.position, -3);
    }

    #[test]
    fn test_last_type_literal_wins_and_attributes_are_skipped() {
        let param = parse_param_chunk(
            "[Parameter()][ValidateNotNullOrEmpty()][Alias('CN')][object][bool]$Enabled",
        )
        .unwrap();
        assert_eq!(param.declared_type, ParameterType::Boolean);

        let param = parse_param_chunk("[ValidateSet('a','b')]$Mode").unwrap();
        assert_eq!(param.declared_type, ParameterType::Object);
    }

    #[test]
    fn test_unknown_type_text_is_passed_through() {
        let param = parse_param_chunk("[System.Management.Automation.PSCredential]$Credential")
            .unwrap();
        assert_eq!(
            param.declared_type,
            ParameterType::Other("System.Management.Automation.PSCredential".to_string())
        );
    }

    #[test]
    fn test_array_type_keeps_element_type() {
        let param = parse_param_chunk("[string[]]$ComputerName = @('a', 'b')").unwrap();
        assert_eq!(param.name, "ComputerName");
        assert_eq!(param.declared_type, ParameterType::String);
    }

    #[test]
    fn test_special_variables_are_not_names() {
        let params = parse_param_block("param($true, [string]$Path = $env:TEMP, $_)");
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "Path");
    }

    #[test]
    fn test_variables_inside_attributes_do_not_bind() {
        let param =
            parse_param_chunk("[ValidateScript({ Test-Path $Root })][string]$Path").unwrap();
        assert_eq!(param.name, "Path");

        let param = parse_param_chunk("[ValidateScript({ $x -gt 0 })][int]$Count").unwrap();
        assert_eq!(param.name, "Count");
        assert_eq!(param.declared_type, ParameterType::Int32);
    }

    #[test]
    fn test_quoted_comma_does_not_split_entries() {
        let params = parse_param_block("param($Path = \"a,b\", [int]$Depth = 2)");
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Path", "Depth"]);
    }

    #[test]
    fn test_missing_or_unbalanced_block_is_empty() {
        assert!(parse_param_block("function Foo { }").is_empty());
        assert!(parse_param_block("param([string]$Name").is_empty());
    }

    #[test]
    fn test_opener_inside_help_comment_is_ignored() {
        let text = "<#\n.EXAMPLE\n  Call with param($x)\n#>\nparam([string]$Real)";
        let params = parse_param_block(text);
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "Real");
    }

    #[test]
    fn test_normalize_type_order() {
        assert_eq!(normalize_type("Switch"), ParameterType::Switch);
        assert_eq!(normalize_type("System.Boolean"), ParameterType::Boolean);
        assert_eq!(normalize_type("Int64"), ParameterType::Int32);
        assert_eq!(normalize_type("String"), ParameterType::String);
        assert_eq!(normalize_type("  "), ParameterType::Object);
        assert_eq!(normalize_type("datetime"), ParameterType::Other("datetime".into()));
    }
}
