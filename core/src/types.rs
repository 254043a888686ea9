//! Record type definitions for script command catalogs.
//!
//! This module defines the data model produced by the discovery parsers and
//! consumed by front ends. The types are designed for serialization with
//! [`serde`] and round-trip through JSON and YAML.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Version of the catalog contract (semver).
///
/// Embedded in every [`CatalogPackage`](crate::CatalogPackage) to track
/// compatibility across catalog versions.
pub const CATALOG_CONTRACT_VERSION: &str = "1.0.0";

/// Category label used when neither the folder layout nor the pattern table
/// yields one.
pub const FALLBACK_CATEGORY: &str = "General";

/// Declared type of a script parameter.
///
/// Attribute text such as `[string]` or `[System.Int64]` is folded onto the
/// closed set of semantic types. Text that matches none of them is kept
/// verbatim in [`Other`](ParameterType::Other) rather than being discarded.
///
/// # Examples
///
/// ```
/// use script_catalog_core::ParameterType;
///
/// assert_eq!(ParameterType::default(), ParameterType::Object);
/// assert_eq!(ParameterType::String.as_str(), "String");
/// assert!(ParameterType::Other("double".into()).is_numeric());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParameterType {
    String,
    /// Presence-only flag (`[switch]`).
    Switch,
    Boolean,
    /// Any integer width (`int`, `int16`, `int32`, `int64`).
    Int32,
    /// Indeterminate type (the default).
    #[default]
    Object,
    /// Unrecognized declared type text, kept as written.
    Other(String),
}

impl ParameterType {
    /// Returns the display name of the type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "String",
            Self::Switch => "Switch",
            Self::Boolean => "Boolean",
            Self::Int32 => "Int32",
            Self::Object => "Object",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Returns `true` for types whose values are emitted without quoting.
    pub fn is_numeric(&self) -> bool {
        match self {
            Self::Int32 => true,
            Self::Other(raw) => {
                let lower = raw.to_ascii_lowercase();
                ["int", "double", "float", "decimal"]
                    .iter()
                    .any(|needle| lower.contains(needle))
            }
            _ => false,
        }
    }

    /// Returns `true` for types that take a boolean value from callers.
    pub fn is_flag_like(&self) -> bool {
        matches!(self, Self::Switch | Self::Boolean)
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ParameterType {
    fn from(value: &str) -> Self {
        match value {
            "String" => Self::String,
            "Switch" => Self::Switch,
            "Boolean" => Self::Boolean,
            "Int32" => Self::Int32,
            "Object" | "" => Self::Object,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for ParameterType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ParameterType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// One formal parameter of a script command.
///
/// A `position` of `-1` marks a parameter that is only addressable by name;
/// non-negative positions define left-to-right placement and may collide.
///
/// # Examples
///
/// ```
/// use script_catalog_core::{ParameterDeclaration, ParameterType};
///
/// let name = ParameterDeclaration::new("Name", ParameterType::String)
///     .mandatory()
///     .at_position(0);
/// assert!(name.required);
/// assert!(name.is_positional());
///
/// let verbose = ParameterDeclaration::new("Verbose", ParameterType::Switch);
/// assert_eq!(verbose.position, -1);
/// assert!(!verbose.is_positional());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    /// Bound variable name without the `$` sigil, case preserved.
    pub name: String,
    pub required: bool,
    #[serde(rename = "type")]
    pub declared_type: ParameterType,
    /// Placement order; `-1` when not positional.
    pub position: i32,
}

impl ParameterDeclaration {
    /// Creates an optional, non-positional parameter.
    pub fn new(name: &str, declared_type: ParameterType) -> Self {
        Self {
            name: name.to_string(),
            required: false,
            declared_type,
            position: -1,
        }
    }

    /// Marks the parameter as mandatory.
    pub fn mandatory(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the placement position.
    pub fn at_position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    pub fn is_positional(&self) -> bool {
        self.position >= 0
    }

    /// Case-insensitive identity check.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Parsed documentation block of a script.
///
/// Only lives while a command record is being assembled; the useful parts
/// are copied onto the [`CommandRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpBlock {
    pub synopsis: String,
    pub description: String,
    /// Whole example blocks, command line and sample output included.
    pub examples: Vec<String>,
    /// Names mentioned by `.PARAMETER` headers, in document order.
    pub parameter_name_hints: Vec<String>,
}

/// One command discovered in a script file.
///
/// `parameters` is sorted ascending by `position` with a stable sort, so
/// non-positional parameters lead the list.
///
/// # Examples
///
/// ```
/// use script_catalog_core::{CommandRecord, ParameterDeclaration, ParameterType};
///
/// let mut record = CommandRecord::new("Get-Thing", "functions/Get-Thing.ps1");
/// record.parameters.push(ParameterDeclaration::new("Name", ParameterType::String));
///
/// assert_eq!(record.invocation, "Get-Thing");
/// assert!(record.find_parameter("name").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub name: String,
    pub category: String,
    pub synopsis: String,
    pub description: String,
    pub examples: Vec<String>,
    pub parameters: Vec<ParameterDeclaration>,
    /// Bare token that starts a synthesized command line.
    pub invocation: String,
    /// Logical path of the source file, as supplied by the caller.
    pub source_path: String,
}

impl CommandRecord {
    /// Creates a record whose invocation token is the command name.
    pub fn new(name: &str, source_path: &str) -> Self {
        Self {
            name: name.to_string(),
            invocation: name.to_string(),
            source_path: source_path.to_string(),
            ..Default::default()
        }
    }

    /// Finds a parameter by case-insensitive name.
    pub fn find_parameter(&self, name: &str) -> Option<&ParameterDeclaration> {
        self.parameters.iter().find(|p| p.matches(name))
    }
}

/// A value supplied by a caller for one parameter.
///
/// Deserializes untagged: JSON `true` becomes [`Flag`](ParameterValue::Flag)
/// and `"text"` becomes [`Text`](ParameterValue::Text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Flag(bool),
    Text(String),
}

impl ParameterValue {
    /// Truthiness used for switch-like parameters.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Flag(on) => *on,
            Self::Text(text) => !text.trim().is_empty(),
        }
    }

    /// Returns `true` when the value carries non-blank text.
    pub fn has_text(&self) -> bool {
        match self {
            Self::Flag(_) => true,
            Self::Text(text) => !text.trim().is_empty(),
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Caller-supplied parameter values keyed by parameter name.
pub type ValueMap = HashMap<String, ParameterValue>;

/// Looks up a value by exact name, then case-insensitively.
///
/// When several keys differ only by case, the byte-wise smallest one wins.
pub fn lookup_value<'a>(values: &'a ValueMap, name: &str) -> Option<&'a ParameterValue> {
    values.get(name).or_else(|| {
        values
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, value)| value)
    })
}
