use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "script_catalog_cli_test_{name}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create script dir");
        }
        fs::write(&path, contents).expect("failed to write script");
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

const PING_SCRIPT: &str = r#"<#
.SYNOPSIS
    Pings a host.
.PARAMETER Target
    Host to ping.
.EXAMPLE
    Test-Ping -Target example.com
#>
function Test-Ping {
    param(
        [Parameter(Mandatory = $true, Position = 0)][string]$Target,
        [int]$Count = 4,
        [switch]$Quiet
    )
}
"#;

const DISK_SCRIPT: &str = r#"function Get-DiskUsage {
    param([string]$Drive = 'C')
}
"#;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_script-catalog"))
        .args(args)
        .output()
        .expect("failed to run script-catalog")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_sample_tree(dir: &TempDir) {
    dir.write("functions/Net/Test-Ping.ps1", PING_SCRIPT);
    dir.write("functions/Storage/scripts/Get-DiskUsage.ps1", DISK_SCRIPT);
    dir.write("functions/Storage/notes.txt", "not a script");
}

// ---------------------------------------------------------------------------
// scan
// ---------------------------------------------------------------------------

#[test]
fn scan_outputs_grouped_json_catalog() {
    let dir = TempDir::new("scan_json");
    write_sample_tree(&dir);

    let output = run(&["scan", dir.path.to_str().unwrap(), "--jobs", "2"]);
    assert!(output.status.success(), "scan failed: {}", stderr(&output));

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output))
        .unwrap_or_else(|e| panic!("Invalid JSON output: {e}\n{}", stdout(&output)));
    let groups = parsed["groups"].as_array().expect("groups array");
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["category"], "Net");
    assert_eq!(groups[0]["commands"][0]["name"], "Test-Ping");
    assert_eq!(
        groups[0]["commands"][0]["source_path"],
        "functions/Net/Test-Ping.ps1"
    );
    assert_eq!(groups[1]["category"], "Storage");
    assert_eq!(groups[1]["commands"][0]["name"], "Get-DiskUsage");
}

#[test]
fn scan_writes_markdown_to_output_file() {
    let dir = TempDir::new("scan_markdown");
    write_sample_tree(&dir);
    let out_path = dir.join("catalog.md");

    let output = run(&[
        "scan",
        dir.path.to_str().unwrap(),
        "--format",
        "markdown",
        "--output",
        out_path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "scan failed: {}", stderr(&output));

    let markdown = fs::read_to_string(&out_path).expect("catalog file should exist");
    assert!(markdown.contains("## Net"));
    assert!(markdown.contains("### Test-Ping"));
    assert!(markdown.contains("Test-Ping -Target example.com"));
    assert!(stderr(&output).contains("2 commands"));
}

#[test]
fn scan_applies_depth_and_config_file() {
    let dir = TempDir::new("scan_config");
    dir.write("functions/Net/Dns/Resolve-Name.ps1", "function Resolve-Name { }");

    let default_run = run(&["scan", dir.path.to_str().unwrap()]);
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&default_run)).unwrap();
    assert_eq!(parsed["groups"][0]["category"], "Net / Dns");

    let config_path = dir.join("catalog.yaml");
    fs::write(&config_path, "category_depth: 1\n").unwrap();
    let config_run = run(&[
        "scan",
        dir.path.to_str().unwrap(),
        "--config",
        config_path.to_str().unwrap(),
    ]);
    assert!(config_run.status.success(), "scan failed: {}", stderr(&config_run));
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&config_run)).unwrap();
    assert_eq!(parsed["groups"][0]["category"], "Net");
}

#[test]
fn scan_missing_root_fails() {
    let dir = TempDir::new("scan_missing");
    let output = run(&["scan", dir.join("nope").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error:"));
}

// ---------------------------------------------------------------------------
// parse-file / category
// ---------------------------------------------------------------------------

#[test]
fn parse_file_outputs_yaml_record() {
    let dir = TempDir::new("parse_yaml");
    let script = dir.write("Test-Ping.ps1", PING_SCRIPT);

    let output = run(&[
        "parse-file",
        "--input",
        script.to_str().unwrap(),
        "--path",
        "functions/Net/Test-Ping.ps1",
        "--format",
        "yaml",
    ]);
    assert!(output.status.success(), "parse-file failed: {}", stderr(&output));

    let yaml = stdout(&output);
    assert!(yaml.contains("name: Test-Ping"));
    assert!(yaml.contains("category: Net"));
    assert!(yaml.contains("source_path: functions/Net/Test-Ping.ps1"));
}

#[test]
fn parse_file_table_lists_parameters() {
    let dir = TempDir::new("parse_table");
    let script = dir.write("Test-Ping.ps1", PING_SCRIPT);

    let output = run(&[
        "parse-file",
        "--input",
        script.to_str().unwrap(),
        "--format",
        "table",
    ]);
    assert!(output.status.success(), "parse-file failed: {}", stderr(&output));
    let table = stdout(&output);
    assert!(table.contains("Command: Test-Ping"));
    assert!(table.contains("Target"));
    assert!(table.contains("Quiet"));
}

#[test]
fn category_prefers_folder_unless_regex_requested() {
    let dir = TempDir::new("category");
    let script = dir.write("Test-Ping.ps1", PING_SCRIPT);

    let folder = run(&[
        "category",
        "--path",
        "functions/Tools/Test-Ping.ps1",
        "--input",
        script.to_str().unwrap(),
    ]);
    assert!(folder.status.success(), "category failed: {}", stderr(&folder));
    assert_eq!(stdout(&folder).trim(), "Tools");

    let pattern = run(&[
        "category",
        "--path",
        "functions/Tools/Test-Ping.ps1",
        "--input",
        script.to_str().unwrap(),
        "--prefer-regex",
    ]);
    assert_eq!(stdout(&pattern).trim(), "Networking");

    let fallback = run(&["category", "--path", "functions/Get-Thing.ps1"]);
    assert_eq!(stdout(&fallback).trim(), "General");
}

// ---------------------------------------------------------------------------
// invoke / init-config
// ---------------------------------------------------------------------------

#[test]
fn invoke_prints_synthesized_command_line() {
    let dir = TempDir::new("invoke_ok");
    let script = dir.write("Test-Ping.ps1", PING_SCRIPT);

    let output = run(&[
        "invoke",
        "--input",
        script.to_str().unwrap(),
        "--set",
        "Target=it's.example",
        "--set",
        "Count=2",
        "--switch",
        "Quiet",
    ]);
    assert!(output.status.success(), "invoke failed: {}", stderr(&output));
    assert_eq!(
        stdout(&output).trim(),
        "Test-Ping 'it''s.example' -Count 2 -Quiet"
    );
}

#[test]
fn invoke_reads_values_file() {
    let dir = TempDir::new("invoke_values");
    let script = dir.write("Test-Ping.ps1", PING_SCRIPT);
    let values = dir.write("values.json", r#"{"target": "host1", "Quiet": true}"#);

    let output = run(&[
        "invoke",
        "--input",
        script.to_str().unwrap(),
        "--values-file",
        values.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "invoke failed: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "Test-Ping 'host1' -Quiet");
}

#[test]
fn invoke_reports_missing_required_with_exit_code_2() {
    let dir = TempDir::new("invoke_missing");
    let script = dir.write("Test-Ping.ps1", PING_SCRIPT);

    let output = run(&[
        "invoke",
        "--input",
        script.to_str().unwrap(),
        "--set",
        "Target=   ",
    ]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("missing required parameters: Target"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn init_config_writes_loadable_defaults() {
    let dir = TempDir::new("init_config");
    let config_path = dir.join("catalog.yaml");

    let output = run(&["init-config", "--output", config_path.to_str().unwrap()]);
    assert!(output.status.success(), "init-config failed: {}", stderr(&output));

    let yaml = fs::read_to_string(&config_path).expect("config should exist");
    assert!(yaml.contains("base_path: functions"));
    assert!(yaml.contains("category_depth: 2"));
    assert!(yaml.contains("prefer_folder: true"));

    dir.write("functions/Net/Test-Ping.ps1", PING_SCRIPT);
    let scan = run(&[
        "scan",
        dir.path.to_str().unwrap(),
        "--config",
        config_path.to_str().unwrap(),
        "--format",
        "table",
    ]);
    assert!(scan.status.success(), "scan failed: {}", stderr(&scan));
    assert!(stdout(&scan).contains("Net (1)"));
}
