//! Error types for Tint Core
//!
//! None of these escape a reconciliation pass; the loop logs them and falls
//! back to the baseline color. They surface to callers only through the
//! settings service, the stores and configuration loading.

use std::path::PathBuf;

/// Mapping store failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend cannot be reached
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// IO error on a file-backed store
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored content is not a valid mapping
    #[error("corrupt store {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Mapping could not be serialized
    #[error("cannot serialize mapping: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Page access failures
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    /// Document has no body to observe
    #[error("document body not found")]
    NoBody,

    /// Observer could not be attached
    #[error("cannot observe mutations: {0}")]
    ObserveFailed(String),
}

/// Settings editor failures
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Alias is empty after trimming
    #[error("alias must not be empty")]
    EmptyAlias,

    /// Underlying store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Configuration failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config file '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A field holds an unusable value
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create a read file error
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a parse TOML error
    pub fn parse_toml(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ParseToml {
            path: path.into(),
            source,
        }
    }
}
