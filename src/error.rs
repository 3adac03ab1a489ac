use std::path::PathBuf;

use thiserror::Error;

/// Main application error type that encompasses all fatal failure modes.
///
/// Per-document problems (malformed XML, no record element matched) are not
/// errors at this level; they are counted outcomes handled by the engine.
#[derive(Error, Debug)]
pub enum FlattenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid record path: {0}")]
    RecordPath(String),
}

/// Configuration-specific error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Unsupported configuration file format: {extension} (expected toml or json)")]
    UnsupportedFormat { extension: String },

    #[error("Missing required configuration field: {field}")]
    MissingField { field: String },

    #[error("Invalid configuration value: {field} = {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Configuration merge conflict: {details}")]
    MergeConflict { details: String },
}

/// Record-path parsing error types
#[derive(Error, Debug)]
pub enum PathError {
    #[error("Record path expression is empty")]
    Empty,

    #[error("Unknown namespace prefix '{prefix}' in record path '{expression}'")]
    UnknownPrefix { prefix: String, expression: String },
}

// Error conversion implementations
impl From<ConfigError> for FlattenError {
    fn from(err: ConfigError) -> Self {
        FlattenError::Config(err.to_string())
    }
}

impl From<PathError> for FlattenError {
    fn from(err: PathError) -> Self {
        FlattenError::RecordPath(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, FlattenError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Record-path result type alias
pub type PathResult<T> = std::result::Result<T, PathError>;
