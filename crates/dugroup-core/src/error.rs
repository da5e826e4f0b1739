//! Error types for scanning operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A grouping/sort field or the root path argument is unusable.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Operation was interrupted.
    #[error("Operation interrupted")]
    Interrupted,

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}

impl ScanError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Error for a field value outside its allowed set.
    pub(crate) fn invalid_field(field: &str, value: &str, allowed: &[&str]) -> Self {
        Self::invalid_argument(format!(
            "invalid {field} field '{value}', possible values are '{}'",
            allowed.join(", ")
        ))
    }

    /// Check if this is an argument error raised before any traversal.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Entry disappeared between listing and stat.
    Vanished,
    /// Error listing a directory.
    ReadError,
    /// Error reading metadata.
    MetadataError,
}

/// Non-fatal, per-entry failure encountered during a scan.
///
/// The entry (or subtree) is skipped and the scan carries on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a permission denied warning.
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Permission denied: {}", path.display()),
            path,
            kind: WarningKind::PermissionDenied,
        }
    }

    /// Create a warning for a failed stat.
    pub fn metadata_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self::classify(path.into(), error, WarningKind::MetadataError)
    }

    /// Create a warning for a failed directory listing.
    pub fn read_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self::classify(path.into(), error, WarningKind::ReadError)
    }

    fn classify(path: PathBuf, error: &std::io::Error, fallback: WarningKind) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            std::io::ErrorKind::NotFound => Self {
                message: format!("Vanished during scan: {}", path.display()),
                path,
                kind: WarningKind::Vanished,
            },
            _ => Self {
                message: format!("{}: {error}", path.display()),
                path,
                kind: fallback,
            },
        }
    }
}

impl std::fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_field_message() {
        let err = ScanError::invalid_field("sort", "bogus", &["files", "size"]);
        assert!(err.is_invalid_argument());
        assert_eq!(
            err.to_string(),
            "Invalid argument: invalid sort field 'bogus', possible values are 'files, size'"
        );
    }

    #[test]
    fn test_warning_classification() {
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let warning = ScanWarning::read_error("/test/path", &denied);
        assert_eq!(warning.kind, WarningKind::PermissionDenied);
        assert!(warning.message.contains("Permission denied"));

        let gone = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(
            ScanWarning::metadata_error("/test/path", &gone).kind,
            WarningKind::Vanished
        );

        let other = std::io::Error::other("disk on fire");
        let warning = ScanWarning::metadata_error("/test/path", &other);
        assert_eq!(warning.kind, WarningKind::MetadataError);
        assert!(warning.to_string().contains("disk on fire"));
    }
}
