use std::fs;
use std::path::PathBuf;

use script_catalog_core::{
    ParameterDeclaration, ParameterType, ValueMap, missing_required, synthesize_invocation,
    validate_record,
};
use script_catalog_discovery::config::CatalogConfig;
use script_catalog_discovery::parse_command;
use script_catalog_discovery::parser::{parse_help_block, parse_param_block};

#[test]
fn test_backup_fixture_extracts_help_and_parameters() {
    let text = fixture("Invoke-Backup.ps1");
    let config = CatalogConfig::default();
    let record = parse_command(&config, &text, "functions/Backup/Invoke-Backup.ps1")
        .expect("fixture should parse");

    assert_eq!(record.name, "Invoke-Backup");
    assert_eq!(record.category, "Backup");
    assert_eq!(record.synopsis, "Copies a folder to a backup share.");
    assert_eq!(
        record.description,
        "Mirrors the source folder to the destination share and\n    keeps the last N snapshots."
    );
    assert_eq!(
        record.examples,
        vec![
            "Invoke-Backup -Source C:\\Data -Destination \\\\nas\\backup\n\n    Copied 120 files."
                .to_string(),
            "Invoke-Backup C:\\Data \\\\nas\\backup -Compress".to_string(),
        ]
    );

    assert_eq!(
        record.parameters,
        vec![
            ParameterDeclaration::new("Retention", ParameterType::Int32),
            ParameterDeclaration::new("Compress", ParameterType::Switch),
            ParameterDeclaration::new("Exclude", ParameterType::String),
            ParameterDeclaration::new("LogPath", ParameterType::String),
            ParameterDeclaration::new("Source", ParameterType::String)
                .mandatory()
                .at_position(0),
            ParameterDeclaration::new("Destination", ParameterType::String)
                .mandatory()
                .at_position(1),
        ]
    );
    assert!(validate_record(&record).is_empty());
}

#[test]
fn test_backup_fixture_hints_skip_prose() {
    let help = parse_help_block(&fixture("Invoke-Backup.ps1"));
    assert_eq!(
        help.parameter_name_hints,
        vec!["Source", "Destination", "Retention", "Compress", "LogPath"]
    );
}

#[test]
fn test_backup_fixture_synthesis_and_missing_required() {
    let text = fixture("Invoke-Backup.ps1");
    let record = parse_command(&CatalogConfig::default(), &text, "Invoke-Backup.ps1").unwrap();

    let mut values = ValueMap::new();
    values.insert("Source".into(), "C:\\Data".into());
    values.insert("Retention".into(), "3".into());
    values.insert("Compress".into(), true.into());
    assert_eq!(missing_required(&record, &values), vec![5]);

    values.insert("Destination".into(), "\\\\nas\\it's".into());
    assert!(missing_required(&record, &values).is_empty());
    assert_eq!(
        synthesize_invocation(&record, &values),
        "Invoke-Backup 'C:\\Data' '\\\\nas\\it''s' -Retention 3 -Compress"
    );
}

#[test]
fn test_script_without_function_uses_file_name() {
    let text = fixture("Get-DiskReport.ps1");
    let config = CatalogConfig::default();
    let record = parse_command(&config, &text, "functions/Storage/Get-DiskReport.ps1")
        .expect("fixture should parse");

    assert_eq!(record.name, "Get-DiskReport");
    assert_eq!(record.category, "Storage");
    assert!(record.synopsis.is_empty());
    assert!(record.examples.is_empty());

    let types: Vec<(&str, &ParameterType)> = record
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), &p.declared_type))
        .collect();
    assert_eq!(
        types,
        vec![
            ("Top", &ParameterType::Int32),
            ("IncludeRemovable", &ParameterType::Boolean),
            (
                "OutFile",
                &ParameterType::Other("System.IO.FileInfo".to_string())
            ),
        ]
    );
}

#[test]
fn test_unbalanced_block_keeps_referenced_hints() {
    let text = fixture("Broken-Param.ps1");
    assert!(parse_param_block(&text).is_empty());

    let record = parse_command(&CatalogConfig::default(), &text, "Broken-Param.ps1").unwrap();
    assert_eq!(record.name, "Broken-Param");
    assert_eq!(record.synopsis, "Has an unterminated parameter list.");
    assert_eq!(
        record.parameters,
        vec![ParameterDeclaration::new("Name", ParameterType::String)]
    );
}

#[test]
fn test_quoted_defaults_and_positions() {
    let text = fixture("Set-Greeting.ps1");
    let record = parse_command(&CatalogConfig::default(), &text, "functions/Set-Greeting.ps1")
        .expect("fixture should parse");

    assert_eq!(record.category, "General");
    assert_eq!(
        record.synopsis,
        "Writes a greeting. Mentions param($Ignored) in prose."
    );
    assert_eq!(record.examples, vec!["Set-Greeting -Greeting 'it''s me'"]);

    let names: Vec<&str> = record.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Options", "Name", "Second", "Greeting"]);
    assert_eq!(
        record.parameters[0].declared_type,
        ParameterType::Other("hashtable".to_string())
    );
    assert_eq!(record.parameters[2].declared_type, ParameterType::Object);

    let mut values = ValueMap::new();
    values.insert("greeting".into(), "it's".into());
    values.insert("Name".into(), "World".into());
    assert_eq!(
        synthesize_invocation(&record, &values),
        "Set-Greeting 'World' 'it''s'"
    );
}

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).expect("fixture file must be readable")
}
