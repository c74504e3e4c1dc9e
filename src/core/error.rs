//! Error types and result handling for drvscan.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for drvscan operations.
#[derive(Error, Debug)]
pub enum Error {
    // ===== I/O Errors =====
    #[error("failed to read file {path} ({kind})")]
    FileRead {
        path: PathBuf,
        kind: ReadErrorKind,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to access directory {path}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ===== Configuration Errors =====
    #[error("invalid configuration value: {field} - {message}")]
    ConfigInvalid { field: String, message: String },

    // ===== Dataset Errors =====
    #[error("failed to download driver dataset from {url}")]
    DatasetDownload {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read driver dataset {path}")]
    DatasetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse driver dataset")]
    DatasetParse(#[source] serde_json::Error),

    // ===== Serialization Errors =====
    #[error("failed to serialize result")]
    Serialize(#[source] serde_json::Error),

    // ===== Generic Errors =====
    #[error("internal error: {0}")]
    Internal(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Structured classification of a per-file read failure.
///
/// The platform error is inspected once here and the rest of the program
/// switches on this enum instead of matching on error message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadErrorKind {
    /// The file vanished between discovery and read.
    NotFound,
    /// The current user may not open the file.
    PermissionDenied,
    /// Another process holds a lock on (a region of) the file.
    Locked,
    /// Anything else.
    Other,
}

impl ReadErrorKind {
    /// Classify an I/O error from opening or reading a candidate file.
    pub fn classify(err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ReadErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ReadErrorKind::PermissionDenied,
            _ => match err.raw_os_error() {
                // ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION
                #[cfg(windows)]
                Some(32) | Some(33) => ReadErrorKind::Locked,
                _ => ReadErrorKind::Other,
            },
        }
    }
}

impl std::fmt::Display for ReadErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadErrorKind::NotFound => write!(f, "not found"),
            ReadErrorKind::PermissionDenied => write!(f, "permission denied"),
            ReadErrorKind::Locked => write!(f, "locked by another process"),
            ReadErrorKind::Other => write!(f, "read error"),
        }
    }
}

impl Error {
    /// Create a classified file read error.
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            kind: ReadErrorKind::classify(&source),
            source,
        }
    }

    /// Create a directory access error.
    pub fn directory_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryAccess {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn config_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this error is recoverable (the scan can continue).
    ///
    /// Per-file and per-result failures are absorbed at the point of
    /// occurrence; only configuration and dataset failures unwind.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::FileRead { .. } | Error::DirectoryAccess { .. } | Error::Serialize(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::file_read("/test/path", io);
        assert_eq!(err.to_string(), "failed to read file /test/path (not found)");
    }

    #[test]
    fn test_read_error_classification() {
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no");
        assert_eq!(
            ReadErrorKind::classify(&denied),
            ReadErrorKind::PermissionDenied
        );

        let gone = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(ReadErrorKind::classify(&gone), ReadErrorKind::NotFound);

        let odd = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        assert_eq!(ReadErrorKind::classify(&odd), ReadErrorKind::Other);
    }

    #[test]
    fn test_recoverable_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no");
        assert!(Error::file_read("/test", io).is_recoverable());

        let err = Error::config_invalid("workers", "must be greater than 0");
        assert!(!err.is_recoverable());
    }
}
