use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use script_catalog_core::{
    CommandRecord, ParameterValue, ValueMap, missing_required, synthesize_invocation,
    validate_package,
};
use script_catalog_discovery::category::derive_category;
use script_catalog_discovery::config::CatalogConfig;
use script_catalog_discovery::discover::build_catalog;
use script_catalog_discovery::output::{OutputFormat, format_catalog, format_record};
use script_catalog_discovery::parse_command;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit code used when `invoke` is missing required parameter values.
const EXIT_MISSING_REQUIRED: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "script-catalog")]
#[command(about = "Offline command catalog for PowerShell script collections")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse every script under a directory into a grouped catalog.
    Scan(ScanArgs),
    /// Parse a single script file into a command record.
    ParseFile(ParseFileArgs),
    /// Print the category a script path would be filed under.
    Category(CategoryArgs),
    /// Build a command line for a script from supplied parameter values.
    Invoke(InvokeArgs),
    /// Write the default configuration as YAML.
    InitConfig(InitConfigArgs),
}

/// Category settings shared by every subcommand that parses scripts.
#[derive(Debug, Args)]
struct ConfigArgs {
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Path prefix that script paths are relative to.
    #[arg(long)]
    base_path: Option<String>,
    /// Number of folder segments used for a category (1-5).
    #[arg(long)]
    depth: Option<usize>,
    /// Comma-separated folder names to leave out of categories.
    #[arg(long)]
    ignore: Option<String>,
    /// Prefer the pattern table over the folder layout.
    #[arg(long)]
    prefer_regex: bool,
}

#[derive(Debug, Args)]
struct ScanArgs {
    /// Directory containing the scripts.
    root: PathBuf,
    #[command(flatten)]
    config: ConfigArgs,
    /// Number of parallel parse jobs (default: adaptive).
    #[arg(long)]
    jobs: Option<usize>,
    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
    /// Write output to a file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ParseFileArgs {
    /// Script file to parse.
    #[arg(long)]
    input: PathBuf,
    /// Logical path used for the category (default: the input path).
    #[arg(long)]
    path: Option<String>,
    #[command(flatten)]
    config: ConfigArgs,
    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct CategoryArgs {
    /// Logical script path.
    #[arg(long)]
    path: String,
    /// Script file whose text is matched against the pattern table.
    #[arg(long)]
    input: Option<PathBuf>,
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Debug, Args)]
struct InvokeArgs {
    /// Script file to build the command line for.
    #[arg(long)]
    input: PathBuf,
    /// Parameter value as NAME=VALUE (repeatable).
    #[arg(long = "set", value_name = "NAME=VALUE")]
    values: Vec<String>,
    /// Switch parameter to turn on (repeatable).
    #[arg(long = "switch", value_name = "NAME")]
    switches: Vec<String>,
    /// JSON object of parameter values (`true`/`false` or strings).
    #[arg(long)]
    values_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct InitConfigArgs {
    /// Output YAML path.
    #[arg(long)]
    output: PathBuf,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Scan(args) => run_scan(args),
        Command::ParseFile(args) => run_parse_file(args),
        Command::Category(args) => run_category(args),
        Command::Invoke(args) => run_invoke(args),
        Command::InitConfig(args) => run_init_config(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Logs to stderr so stdout stays machine-readable. `RUST_LOG` overrides the
/// default `warn` filter.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_scan(args: ScanArgs) -> Result<(), String> {
    let config = resolve_config(&args.config)?;
    let outcome = build_catalog(&config, &args.root, args.jobs, PACKAGE_VERSION)
        .map_err(|err| format!("Failed to scan '{}': {err}", args.root.display()))?;

    for path in &outcome.skipped {
        eprintln!("skipped: {path}");
    }
    for error in validate_package(&outcome.package) {
        warn!(%error, "Catalog validation problem");
    }

    let rendered = format_catalog(&outcome.package, args.format)?;
    write_output(&rendered, args.output.as_deref())?;

    if args.output.is_some() {
        eprintln!(
            "Catalog: {} commands in {} categories ({} skipped)",
            outcome.package.command_count(),
            outcome.package.groups.len(),
            outcome.skipped.len()
        );
    }
    Ok(())
}

fn run_parse_file(args: ParseFileArgs) -> Result<(), String> {
    let config = resolve_config(&args.config)?;
    let record = load_record(&config, &args.input, args.path.as_deref())?;
    let rendered = format_record(&record, args.format)?;
    write_output(&rendered, None)
}

fn run_category(args: CategoryArgs) -> Result<(), String> {
    let config = resolve_config(&args.config)?;
    let text = args.input.as_deref().map(read_script).transpose()?;
    println!("{}", derive_category(&config, &args.path, text.as_deref()));
    Ok(())
}

fn run_invoke(args: InvokeArgs) -> Result<(), String> {
    let record = load_record(&CatalogConfig::default(), &args.input, None)?;

    let mut values = match &args.values_file {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
            serde_json::from_str::<ValueMap>(&raw)
                .map_err(|err| format!("Invalid values file '{}': {err}", path.display()))?
        }
        None => ValueMap::new(),
    };
    for assignment in &args.values {
        let (name, value) = parse_assignment(&record, assignment)?;
        values.insert(name, value);
    }
    for name in &args.switches {
        values.insert(name.clone(), ParameterValue::Flag(true));
    }

    let missing = missing_required(&record, &values);
    if !missing.is_empty() {
        let names: Vec<&str> = missing
            .iter()
            .map(|&index| record.parameters[index].name.as_str())
            .collect();
        eprintln!("missing required parameters: {}", names.join(", "));
        std::process::exit(EXIT_MISSING_REQUIRED);
    }

    println!("{}", synthesize_invocation(&record, &values));
    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<(), String> {
    CatalogConfig::default()
        .save(&args.output)
        .map_err(|err| format!("Failed to write '{}': {err}", args.output.display()))?;
    println!("Wrote default configuration to {}", args.output.display());
    Ok(())
}

/// Loads the configuration file (if any) and applies flag overrides.
fn resolve_config(args: &ConfigArgs) -> Result<CatalogConfig, String> {
    let mut config = match &args.config {
        Some(path) => CatalogConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => CatalogConfig::default(),
    };

    if let Some(base_path) = &args.base_path {
        config.base_path = base_path.clone();
    }
    if let Some(depth) = args.depth {
        config.category_depth = depth;
    }
    if args.ignore.is_some() {
        config.ignore = parse_csv_list(args.ignore.clone());
    }
    if args.prefer_regex {
        config.prefer_folder = false;
    }

    let config = config.normalized();
    debug!(?config, "Resolved catalog configuration");
    Ok(config)
}

fn read_script(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("Failed to read '{}': {err}", path.display()))
}

fn load_record(
    config: &CatalogConfig,
    input: &Path,
    logical_path: Option<&str>,
) -> Result<CommandRecord, String> {
    let text = read_script(input)?;
    let fallback = input.to_string_lossy().replace('\\', "/");
    let path = logical_path.unwrap_or(&fallback);
    parse_command(config, &text, path)
        .ok_or_else(|| format!("No command name found in '{}'", input.display()))
}

/// Parses a `NAME=VALUE` assignment. Values for switch and boolean
/// parameters are read as flags.
fn parse_assignment(
    record: &CommandRecord,
    assignment: &str,
) -> Result<(String, ParameterValue), String> {
    let (name, raw) = assignment
        .split_once('=')
        .ok_or_else(|| format!("Expected NAME=VALUE, got '{assignment}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Missing parameter name in '{assignment}'"));
    }

    let flag_like = record
        .find_parameter(name)
        .is_some_and(|param| param.declared_type.is_flag_like());
    let value = match (flag_like, parse_flag(raw)) {
        (true, Some(on)) => ParameterValue::Flag(on),
        _ => ParameterValue::Text(raw.to_string()),
    };
    Ok((name.to_string(), value))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().trim_start_matches('$').to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn write_output(rendered: &str, output: Option<&Path>) -> Result<(), String> {
    match output {
        Some(path) => fs::write(path, rendered)
            .map_err(|err| format!("Failed to write '{}': {err}", path.display())),
        None => {
            print!("{rendered}");
            if !rendered.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}

fn parse_csv_list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use script_catalog_core::{ParameterDeclaration, ParameterType};

    use super::*;

    fn record() -> CommandRecord {
        let mut record = CommandRecord::new("Set-Thing", "Set-Thing.ps1");
        record.parameters = vec![
            ParameterDeclaration::new("Enabled", ParameterType::Boolean),
            ParameterDeclaration::new("Force", ParameterType::Switch),
            ParameterDeclaration::new("Name", ParameterType::String),
        ];
        record
    }

    #[test]
    fn test_parse_csv_list_trims_and_drops_empty() {
        let parsed = parse_csv_list(Some(" scripts, ,Tools ,".to_string()));
        assert_eq!(parsed, vec!["scripts".to_string(), "Tools".to_string()]);
    }

    #[test]
    fn test_parse_csv_list_none_is_empty() {
        assert!(parse_csv_list(None).is_empty());
    }

    #[test]
    fn test_parse_assignment_reads_flags_for_boolean_parameters() {
        let record = record();
        assert_eq!(
            parse_assignment(&record, "enabled=$false").unwrap(),
            ("enabled".to_string(), ParameterValue::Flag(false))
        );
        assert_eq!(
            parse_assignment(&record, "Name=a=b").unwrap(),
            ("Name".to_string(), ParameterValue::Text("a=b".to_string()))
        );
        assert_eq!(
            parse_assignment(&record, "Name=true").unwrap(),
            ("Name".to_string(), ParameterValue::Text("true".to_string()))
        );
    }

    #[test]
    fn test_parse_assignment_rejects_malformed_input() {
        let record = record();
        assert!(parse_assignment(&record, "Name").is_err());
        assert!(parse_assignment(&record, "=value").is_err());
    }

    #[test]
    fn test_resolve_config_applies_overrides() {
        let args = ConfigArgs {
            config: None,
            base_path: Some("./tools/".to_string()),
            depth: Some(9),
            ignore: Some("misc, extra".to_string()),
            prefer_regex: true,
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.base_path, "tools");
        assert_eq!(config.category_depth, 5);
        assert_eq!(config.ignore, vec!["misc".to_string(), "extra".to_string()]);
        assert!(!config.prefer_folder);
    }
}
