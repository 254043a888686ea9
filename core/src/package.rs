use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CommandRecord, FALLBACK_CATEGORY};

/// Commands sharing one category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: String,
    pub commands: Vec<CommandRecord>,
}

/// Groups records by category for display.
///
/// Records with an empty category land in [`FALLBACK_CATEGORY`]. Groups are
/// ordered by category name and commands within a group by command name,
/// so the result does not depend on the order records were produced in.
///
/// # Examples
///
/// ```
/// use script_catalog_core::*;
///
/// let mut ping = CommandRecord::new("Test-Ping", "net/Test-Ping.ps1");
/// ping.category = "Networking".into();
/// let thing = CommandRecord::new("Get-Thing", "Get-Thing.ps1");
///
/// let groups = group_by_category(vec![ping, thing]);
/// assert_eq!(groups[0].category, "General");
/// assert_eq!(groups[1].category, "Networking");
/// ```
pub fn group_by_category(records: Vec<CommandRecord>) -> Vec<CategoryGroup> {
    let mut by_category: BTreeMap<String, Vec<CommandRecord>> = BTreeMap::new();
    for record in records {
        let key = if record.category.trim().is_empty() {
            FALLBACK_CATEGORY.to_string()
        } else {
            record.category.clone()
        };
        by_category.entry(key).or_default().push(record);
    }

    by_category
        .into_iter()
        .map(|(category, mut commands)| {
            commands.sort_by(|a, b| {
                a.name
                    .cmp(&b.name)
                    .then_with(|| a.source_path.cmp(&b.source_path))
            });
            CategoryGroup { category, commands }
        })
        .collect()
}

/// Serializable catalog bundle produced by one scan.
///
/// # Examples
///
/// ```
/// use script_catalog_core::*;
///
/// let mut package = CatalogPackage::new("0.1.0", "2026-01-15T10:30:00Z");
/// package.groups = group_by_category(vec![CommandRecord::new("Get-Thing", "Get-Thing.ps1")]);
///
/// assert_eq!(package.command_count(), 1);
/// assert!(package.find_command("get-thing").is_some());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPackage {
    /// Catalog contract version (populated from
    /// [`CATALOG_CONTRACT_VERSION`](crate::CATALOG_CONTRACT_VERSION)).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_version: Option<String>,
    /// Version of the tool that produced the package.
    pub version: String,
    pub name: Option<String>,
    /// ISO-8601 timestamp for package creation.
    pub generated_at: String,
    pub groups: Vec<CategoryGroup>,
}

impl CatalogPackage {
    pub fn new(version: impl Into<String>, generated_at: impl Into<String>) -> Self {
        Self {
            catalog_version: Some(crate::CATALOG_CONTRACT_VERSION.to_string()),
            version: version.into(),
            name: None,
            generated_at: generated_at.into(),
            groups: Vec::new(),
        }
    }

    /// Returns the number of commands across all groups.
    pub fn command_count(&self) -> usize {
        self.groups.iter().map(|group| group.commands.len()).sum()
    }

    /// Finds the first command with the given name (case-insensitive).
    pub fn find_command(&self, name: &str) -> Option<&CommandRecord> {
        self.groups
            .iter()
            .flat_map(|group| group.commands.iter())
            .find(|record| record.name.eq_ignore_ascii_case(name))
    }
}
