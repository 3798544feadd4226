//! Error types for dcdump
//!
//! All fallible operations return `DumpResult<T>`. The payload extractor is
//! infallible by construction and never produces one of these.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dcdump operations
pub type DumpResult<T> = Result<T, DumpError>;

/// All errors that can occur while dumping a cache
#[derive(Error, Debug)]
pub enum DumpError {
    // Environment errors
    #[error("Unsupported platform: {0}. dcdump supports Linux, macOS and Windows.")]
    UnsupportedPlatform(String),

    #[error("Failed to obtain the current user")]
    UserNotFound,

    #[error("Unable to determine home directory for {0}")]
    HomeNotFound(String),

    #[error("Unable to parse {var} as a numeric id: {value}")]
    InvalidId { var: &'static str, value: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Dump errors
    #[error("Insufficient storage at {path}: {required} bytes required, {available} bytes available")]
    InsufficientStorage {
        path: PathBuf,
        required: u64,
        available: u64,
    },

    #[error("Write error: {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl DumpError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a write error for a destination path
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Bytes that still need freeing, if this is a storage error
    pub fn shortfall(&self) -> Option<u64> {
        match self {
            Self::InsufficientStorage {
                required,
                available,
                ..
            } => Some(required.saturating_sub(*available)),
            _ => None,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InsufficientStorage { .. } => {
                Some("Free up space or pass --output pointing at a larger volume")
            }
            Self::Write { .. } => Some("Check that the output directory is writable"),
            Self::ConfigInvalid { .. } => Some("Run `dcdump config init --force` to reset it"),
            Self::HomeNotFound(_) => Some("Pass --home or set DCDUMP_HOME"),
            Self::UnsupportedPlatform(_) => {
                Some("Use `dcdump extract` on copied cache files instead")
            }
            _ => None,
        }
    }
}
