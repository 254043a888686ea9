//! Output formatting for command records and catalogs.

use script_catalog_core::{CatalogPackage, CommandRecord, ParameterDeclaration};

/// Markdown and table renderings show at most this many examples.
pub const MAX_RENDERED_EXAMPLES: usize = 3;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

/// Formats a single record in the requested output format.
pub fn format_record(record: &CommandRecord, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(record)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(record).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(record_to_markdown(record, 1)),
        OutputFormat::Table => Ok(record_to_table(record)),
    }
}

/// Formats a catalog package in the requested output format.
pub fn format_catalog(package: &CatalogPackage, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(package)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(package).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(catalog_to_markdown(package)),
        OutputFormat::Table => Ok(catalog_to_table(package)),
    }
}

/// Splits an example into its command line and right-trimmed output lines.
///
/// Blank lines after the command and at the end of the output are dropped.
pub fn split_example(example: &str) -> (&str, Vec<&str>) {
    let mut lines = example.lines();
    let command = lines.next().unwrap_or_default().trim();
    let mut output: Vec<&str> = lines
        .map(str::trim_end)
        .skip_while(|line| line.is_empty())
        .collect();
    while output.last().is_some_and(|line| line.is_empty()) {
        output.pop();
    }
    (command, output)
}

fn parameter_label(param: &ParameterDeclaration) -> String {
    if param.is_positional() {
        param.position.to_string()
    } else {
        "named".to_string()
    }
}

fn record_to_markdown(record: &CommandRecord, level: usize) -> String {
    let heading = "#".repeat(level);
    let mut out = String::new();

    out.push_str(&format!("{heading} {}\n\n", record.name));

    if !record.synopsis.is_empty() {
        out.push_str(&format!("{}\n\n", record.synopsis));
    }

    out.push_str(&format!("**Category:** {}\n\n", record.category));
    out.push_str(&format!("**Source:** `{}`\n\n", record.source_path));

    if !record.description.is_empty() {
        out.push_str(&format!("{}\n\n", record.description));
    }

    if !record.parameters.is_empty() {
        out.push_str(&format!("{heading}# Parameters\n\n"));
        out.push_str("| Parameter | Type | Required | Position |\n");
        out.push_str("|-----------|------|----------|----------|\n");
        for param in &record.parameters {
            let required = if param.required { "yes" } else { "no" };
            out.push_str(&format!(
                "| `{}` | {} | {required} | {} |\n",
                param.name,
                param.declared_type,
                parameter_label(param)
            ));
        }
        out.push('\n');
    }

    if !record.examples.is_empty() {
        out.push_str(&format!("{heading}# Examples\n\n"));
        for example in record.examples.iter().take(MAX_RENDERED_EXAMPLES) {
            let (command, output) = split_example(example);
            out.push_str(&format!("```powershell\n{command}\n```\n\n"));
            if !output.is_empty() {
                for line in output {
                    out.push_str(&format!("    {line}\n"));
                }
                out.push('\n');
            }
        }
    }

    out
}

fn record_to_table(record: &CommandRecord) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Command: {}  Category: {}\n",
        record.name, record.category
    ));
    if !record.synopsis.is_empty() {
        out.push_str(&format!("  {}\n", record.synopsis));
    }

    if !record.parameters.is_empty() {
        out.push_str("\nParameters:\n");
        let max_name = record
            .parameters
            .iter()
            .map(|p| p.name.len())
            .max()
            .unwrap_or(4);
        let max_type = record
            .parameters
            .iter()
            .map(|p| p.declared_type.as_str().len())
            .max()
            .unwrap_or(4);

        for param in &record.parameters {
            let required = if param.required { "required" } else { "optional" };
            out.push_str(&format!(
                "  {:<name_width$}  {:<type_width$}  {required:<8}  {}\n",
                param.name,
                param.declared_type.as_str(),
                parameter_label(param),
                name_width = max_name,
                type_width = max_type,
            ));
        }
    }

    if !record.examples.is_empty() {
        out.push_str("\nExamples:\n");
        for example in record.examples.iter().take(MAX_RENDERED_EXAMPLES) {
            let (command, output) = split_example(example);
            out.push_str(&format!("  > {command}\n"));
            for line in output {
                out.push_str(&format!("      {line}\n"));
            }
        }
    }

    out
}

fn catalog_to_markdown(package: &CatalogPackage) -> String {
    let mut out = String::new();

    let title = package.name.as_deref().unwrap_or("Script Catalog");
    out.push_str(&format!("# {title}\n\n"));
    out.push_str(&format!(
        "- **Commands:** {}\n- **Generated:** {}\n\n",
        package.command_count(),
        package.generated_at
    ));

    for group in &package.groups {
        out.push_str(&format!("## {}\n\n", group.category));
        for record in &group.commands {
            out.push_str(&record_to_markdown(record, 3));
        }
    }

    out
}

fn catalog_to_table(package: &CatalogPackage) -> String {
    let mut out = String::new();

    let max_name = package
        .groups
        .iter()
        .flat_map(|group| group.commands.iter())
        .map(|record| record.name.len())
        .max()
        .unwrap_or(4);

    for group in &package.groups {
        out.push_str(&format!("{} ({})\n", group.category, group.commands.len()));
        for record in &group.commands {
            out.push_str(&format!(
                "  {:<width$}  {:>2} params  {}\n",
                record.name,
                record.parameters.len(),
                record.synopsis.lines().next().unwrap_or_default(),
                width = max_name
            ));
        }
    }

    out.push_str(&format!("\nTotal: {} commands\n", package.command_count()));
    out
}
