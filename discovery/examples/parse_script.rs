//! Basic script parsing example.
//!
//! Demonstrates how to use `parse_command()` to extract a command record from
//! script text and build a command line from it, without running anything.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p script-catalog-discovery --example parse_script
//! ```

use script_catalog_core::{ValueMap, missing_required, synthesize_invocation};
use script_catalog_discovery::config::CatalogConfig;
use script_catalog_discovery::parse_command;

fn main() {
    let text = r#"
<#
.SYNOPSIS
    Restarts a Windows service.
.PARAMETER Name
    Service name.
.PARAMETER Force
    Skip the confirmation prompt.
.EXAMPLE
    Restart-Thing -Name Spooler -Force
#>
function Restart-Thing {
    param(
        [Parameter(Mandatory = $true, Position = 0)][string]$Name,
        [int]$TimeoutSeconds = 30,
        [switch]$Force
    )
}
"#;

    let config = CatalogConfig::default();
    let Some(record) = parse_command(&config, text, "functions/Services/Restart-Thing.ps1") else {
        println!("No command name could be derived.");
        return;
    };

    println!("Command: {}", record.name);
    println!("Category: {}", record.category);
    println!("Synopsis: {}", record.synopsis);

    println!("\nParameters ({}):", record.parameters.len());
    for param in &record.parameters {
        let req = if param.required { "required" } else { "optional" };
        println!(
            "  {} ({req}, {}, position {})",
            param.name, param.declared_type, param.position
        );
    }

    let mut values = ValueMap::new();
    values.insert("Force".into(), true.into());
    let missing = missing_required(&record, &values);
    println!("\nMissing before filling in Name: {missing:?}");

    values.insert("Name".into(), "Spooler".into());
    println!("Command line: {}", synthesize_invocation(&record, &values));
}
