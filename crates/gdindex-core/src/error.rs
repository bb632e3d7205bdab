//! Error types for indexing runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort an indexing run.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The input archive could not be read or extracted.
    #[error("Archive error at {path}: {message}")]
    Archive { path: PathBuf, message: String },

    /// A collection could not be serialized.
    #[error("Failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl IndexError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an archive error with path context.
    pub fn archive(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Archive {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Kind of indexing warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// A directory entry could not be enumerated.
    WalkError,
    /// File bytes were not valid text in any supported encoding.
    DecodeFailed,
    /// An ignore pattern failed to compile and was dropped.
    InvalidPattern,
}

/// Non-fatal warning encountered during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl IndexWarning {
    /// Create a new warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a warning for an ignore pattern that did not compile.
    pub fn invalid_pattern(source: impl Into<PathBuf>, pattern: &str, error: &str) -> Self {
        Self {
            path: source.into(),
            message: format!("Invalid ignore pattern '{pattern}': {error}"),
            kind: WarningKind::InvalidPattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_error_io() {
        let err = IndexError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, IndexError::PermissionDenied { .. }));

        let err = IndexError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        );
        assert!(matches!(err, IndexError::Io { .. }));
    }

    #[test]
    fn test_archive_error_message() {
        let err = IndexError::archive("/tmp/repo.zip", "invalid Zip archive");
        assert!(err.to_string().contains("repo.zip"));
        assert!(err.to_string().contains("invalid Zip archive"));
    }

    #[test]
    fn test_invalid_pattern_warning() {
        let warning = IndexWarning::invalid_pattern(".indexignore", "a[", "unclosed class");
        assert_eq!(warning.kind, WarningKind::InvalidPattern);
        assert!(warning.message.contains("a["));
    }
}
