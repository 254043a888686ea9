//! Error types for catalog file operations.
//!
//! Parsing never fails; these errors only arise when reading configuration,
//! or walking script directories.

use thiserror::Error;

/// Errors that can occur while loading configuration or scanning scripts.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Filesystem I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid or missing input (e.g. a scan root that is not a directory).
    #[error("{0}")]
    InvalidInput(String),
}

/// Convenience alias for results with [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
