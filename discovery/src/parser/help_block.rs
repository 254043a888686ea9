//! Comment-based help block parsing.
//!
//! Extracts the first `<# ... #>` block and splits it into dot-prefixed
//! sections (`.SYNOPSIS`, `.DESCRIPTION`, `.EXAMPLE`, `.PARAMETER`, ...).
//! A second help block in the same file is ignored.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use script_catalog_core::HelpBlock;

static HELP_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<#(.*?)#>").expect("static regex must compile"));
static SECTION_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.(\w+)").expect("static regex must compile"));
static PARAMETER_HINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*\.PARAMETER[ \t]+(\S+)").expect("static regex must compile")
});

/// Returns `true` for words that show up after `.PARAMETER` in prose rather
/// than naming a parameter.
fn is_junk_hint(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "none" | "no" | "parameter" | "parameters" | "true" | "false" | "n/a" | "na"
    )
}

#[derive(Debug, Default)]
struct Section {
    name: String,
    lines: Vec<String>,
}

/// Parses the first help block of `text`.
///
/// Returns an empty [`HelpBlock`] when the text has no `<# ... #>` pair.
pub fn parse_help_block(text: &str) -> HelpBlock {
    let Some(captures) = HELP_BLOCK_RE.captures(text) else {
        return HelpBlock::default();
    };
    let body = captures.get(1).map_or("", |m| m.as_str());

    let mut block = HelpBlock {
        parameter_name_hints: parameter_hints(body),
        ..Default::default()
    };

    let mut synopsis = Vec::new();
    let mut description = Vec::new();
    for section in split_sections(body) {
        match section.name.as_str() {
            "SYNOPSIS" => synopsis.extend(section.lines),
            "DESCRIPTION" => description.extend(section.lines),
            name if name.starts_with("EXAMPLE") => {
                let example = tidy_lines(&section.lines);
                if !example.is_empty() {
                    block.examples.push(example);
                }
            }
            _ => {}
        }
    }
    block.synopsis = tidy_lines(&synopsis);
    block.description = tidy_lines(&description);

    block
}

/// Collects `.PARAMETER` names in document order, deduplicated
/// case-insensitively.
fn parameter_hints(body: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    PARAMETER_HINT_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|name| !is_junk_hint(name))
        .filter(|name| seen.insert(name.to_ascii_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Splits a help body into sections. Every header line starts a new
/// section, so repeated `.EXAMPLE` headers produce separate sections.
fn split_sections(body: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for raw in body.lines() {
        if let Some(caps) = SECTION_HEADER_RE.captures(raw.trim()) {
            sections.push(Section {
                name: caps[1].to_ascii_uppercase(),
                lines: Vec::new(),
            });
            continue;
        }
        if let Some(current) = sections.last_mut() {
            current.lines.push(raw.trim_end().to_string());
        }
    }

    sections
}

/// Drops leading and trailing blank lines and the leading whitespace of the
/// first kept line. Later lines keep their indentation.
fn tidy_lines(lines: &[String]) -> String {
    let Some(first) = lines.iter().position(|line| !line.trim().is_empty()) else {
        return String::new();
    };
    let last = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .unwrap_or(first);

    lines[first..=last].join("\n").trim_start().to_string()
}
