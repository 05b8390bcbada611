//! Error types for the chart generation pipeline.
//!
//! This module provides the error hierarchy for every stage of a run:
//! loading and validating configuration, synthesizing charts, and syncing
//! the umbrella chart.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for chartforge.
#[derive(Debug, Error)]
pub enum ChartforgeError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Chart synthesis errors.
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    /// Umbrella chart errors.
    #[error("Umbrella error: {0}")]
    Umbrella(#[from] UmbrellaError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file was not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The file could not be parsed.
    #[error("Failed to parse {}: {message}", .location.as_deref().unwrap_or("input"))]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Required fields are missing.
    #[error("Missing required fields: {}", .missing.join(", "))]
    ValidationError {
        /// Every required field that was absent, in declaration order.
        missing: Vec<String>,
    },

    /// A service or chart name cannot be used as a directory name.
    #[error("Invalid name '{name}': use letters, digits, '.', '_' or '-', and not '.' or '..'")]
    InvalidName {
        /// The rejected name.
        name: String,
    },
}

/// Chart synthesis errors.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Writing a chart file or directory failed.
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        /// Path being written.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Copying a library template failed.
    #[error("Failed to copy library template {from} to {to}: {source}")]
    CopyFailed {
        /// Source template.
        from: PathBuf,
        /// Destination path.
        to: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A document could not be serialized.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
    },

    /// The output path has no usable directory name.
    #[error("Invalid output directory: {path}")]
    InvalidOutput {
        /// The rejected path.
        path: PathBuf,
    },
}

/// Umbrella chart errors.
#[derive(Debug, Error)]
pub enum UmbrellaError {
    /// The umbrella chart has no `Chart.yaml`.
    #[error("Chart.yaml not found at {path}")]
    DescriptorNotFound {
        /// Expected descriptor path.
        path: PathBuf,
    },

    /// The services directory does not exist.
    #[error("Services directory not found: {path}")]
    ServicesDirNotFound {
        /// Path to the missing directory.
        path: PathBuf,
    },

    /// Walking the services directory failed.
    #[error("Failed to scan services directory: {message}")]
    DiscoveryFailed {
        /// Description of the traversal failure.
        message: String,
    },
}

/// Coarse classification of errors, as reported to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced path is absent.
    NotFound,
    /// Structured text was malformed.
    Parse,
    /// Required fields are missing or unusable.
    Validation,
    /// Reading or writing the filesystem failed.
    Io,
}

/// Result type alias for chartforge operations.
pub type Result<T> = std::result::Result<T, ChartforgeError>;

impl ChartforgeError {
    /// Classifies this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(ConfigError::FileNotFound { .. })
            | Self::Umbrella(
                UmbrellaError::DescriptorNotFound { .. } | UmbrellaError::ServicesDirNotFound { .. },
            ) => ErrorKind::NotFound,
            Self::Config(ConfigError::ParseError { .. }) => ErrorKind::Parse,
            Self::Config(
                ConfigError::ValidationError { .. } | ConfigError::InvalidName { .. },
            ) => ErrorKind::Validation,
            Self::Chart(_) | Self::Umbrella(UmbrellaError::DiscoveryFailed { .. }) | Self::Io(_) => {
                ErrorKind::Io
            }
        }
    }
}

impl ConfigError {
    /// Creates a parse error attributed to a source location.
    #[must_use]
    pub fn parse(message: impl Into<String>, location: Option<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location,
        }
    }
}

impl ChartError {
    /// Creates a write error for the given path.
    #[must_use]
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Creates a serialization error with the given message.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}
