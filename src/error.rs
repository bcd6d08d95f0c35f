//! Error types for pkgstash
//!
//! All modules use `StashResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pkgstash operations
pub type StashResult<T> = Result<T, StashError>;

/// All errors that can occur in pkgstash
#[derive(Error, Debug)]
pub enum StashError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Identity errors
    #[error("Invalid package identity {input:?}: {reason}")]
    InvalidIdentity { input: String, reason: String },

    // Blob store errors
    #[error("Blob not found: {0}")]
    BlobNotFound(PathBuf),

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Fetch errors
    #[error("No artifact source configured")]
    SourceNotConfigured,

    #[error("Artifact not found in source: {0}")]
    ArtifactNotFound(String),

    #[error("HTTP request for {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("Fetch task failed: {0}")]
    FetchTask(String),

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

impl StashError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid identity error
    pub fn invalid_identity(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentity {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Check if the error came from the artifact source rather than the cache
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::SourceNotConfigured
                | Self::ArtifactNotFound(_)
                | Self::Http { .. }
                | Self::FetchTask(_)
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::SourceNotConfigured => {
                Some("Run: pkgstash config set source.url <url-template> (or source.dir)")
            }
            Self::InvalidIdentity { .. } => Some("Versions must look like MAJOR.MINOR.PATCH"),
            Self::ConfigInvalid { .. } => Some("Run: pkgstash config show"),
            _ => None,
        }
    }
}
