use std::path::PathBuf;

use thiserror::Error;

use crate::version_file::VersionFileNotUpdated;

/// Unified error type for bumpify operations
#[derive(Error, Debug)]
pub enum BumpifyError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("No commits found in: {0}")]
    NoCommitsFound(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Config file could not be parsed: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config file could not be written: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Unsupported changelog format: {path}")]
    UnsupportedChangelogFormat { path: String },

    #[error("Unsupported encoding '{encoding}' for file: {path}")]
    UnsupportedEncoding { path: String, encoding: String },

    #[error(transparent)]
    VersionFileNotUpdated(#[from] VersionFileNotUpdated),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in bumpify
pub type Result<T> = std::result::Result<T, BumpifyError>;

impl BumpifyError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumpifyError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        BumpifyError::Version(msg.into())
    }

    /// Create a repository error with context
    pub fn repository(msg: impl Into<String>) -> Self {
        BumpifyError::Repository(msg.into())
    }

    /// Create an unsupported changelog format error for the given path
    pub fn unsupported_changelog_format(path: impl Into<String>) -> Self {
        BumpifyError::UnsupportedChangelogFormat { path: path.into() }
    }
}
