//! Error types for catalog loading.

use lilyflower_core::SchemaError;
use thiserror::Error;

/// Errors that can occur while reading, writing or registering a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Catalog format version this crate cannot read.
    #[error("unsupported catalog version: {0:?}")]
    UnsupportedVersion(String),

    /// A definition was rejected by the registry.
    #[error("invalid element in {origin}: {error}")]
    InvalidDefinition { origin: String, error: SchemaError },
}

/// Convenience alias for results with [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;
