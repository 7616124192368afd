//! Config loading and access errors.

use super::reader::ReaderType;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or editing a config tree.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config path was empty
    #[error("invalid file path")]
    InvalidFilePath,

    /// The file suffix names no known reader type
    #[error("unknown file suffix: {}", .0.display())]
    UnknownSuffix(PathBuf),

    /// The reader type is recognised but cannot hold a config tree
    #[error("reader type {0} is not supported for schema-less config trees")]
    UnsupportedReaderType(ReaderType),

    /// The config file could not be read
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON text failed to parse, or a value failed to convert through JSON
    #[error("invalid json config: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML text failed to parse or serialize
    #[error("invalid yaml config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document root is not a map
    #[error("config root must be a map")]
    RootNotMap,

    /// A dotted key was empty or had an empty segment
    #[error("invalid key")]
    InvalidKey,

    /// A `${...}` reference names a path that does not exist
    #[error("'{key}' refers to missing value '{reference}'")]
    UnresolvedReference { key: String, reference: String },

    /// A `${...}` reference leads back to itself
    #[error("reference cycle through '{reference}'")]
    CyclicReference { reference: String },

    /// Expanding `${...}` references copied more values than allowed
    #[error("reference expansion exceeds {limit} values")]
    ExpansionTooLarge { limit: usize },
}
