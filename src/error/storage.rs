//! Local storage error types.
//!
//! Raised by the recent-searches store. Readers never see these: a missing
//! or corrupt file loads as an empty list, so only writes can fail.

use std::fmt;
use std::path::PathBuf;

/// Storage-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// Permission denied for a file/directory operation.
    PermissionDenied { path: PathBuf, operation: String },

    /// Failed to create the parent directory.
    DirectoryCreationFailed { path: PathBuf, message: String },

    /// Generic I/O error.
    Io {
        operation: String,
        path: Option<PathBuf>,
        message: String,
    },

    /// Could not determine the home directory for the default location.
    NoHomeDirectory,

    /// Failed to serialize the stored list.
    Serialization { message: String },
}

impl StorageError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StorageError::PermissionDenied { path, operation } => format!(
                "Permission denied: cannot {} '{}'.",
                operation,
                path.display()
            ),
            StorageError::DirectoryCreationFailed { path, .. } => format!(
                "Failed to create directory '{}'. Please check permissions.",
                path.display()
            ),
            StorageError::Io { operation, path, .. } => match path {
                Some(p) => format!("Failed to {} '{}'", operation, p.display()),
                None => format!("Failed to {}", operation),
            },
            StorageError::NoHomeDirectory => {
                "Could not determine your home directory.".to_string()
            }
            StorageError::Serialization { .. } => {
                "Failed to save recent searches.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::PermissionDenied { .. } => "E_STORE_PERM",
            StorageError::DirectoryCreationFailed { .. } => "E_STORE_DIR_CREATE",
            StorageError::Io { .. } => "E_STORE_IO",
            StorageError::NoHomeDirectory => "E_STORE_NO_HOME",
            StorageError::Serialization { .. } => "E_STORE_SERDE",
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::PermissionDenied { path, operation } => {
                write!(f, "Permission denied: {} '{}'", operation, path.display())
            }
            StorageError::DirectoryCreationFailed { path, message } => write!(
                f,
                "Failed to create directory '{}': {}",
                path.display(),
                message
            ),
            StorageError::Io {
                operation,
                path,
                message,
            } => match path {
                Some(p) => write!(
                    f,
                    "I/O error during {} at '{}': {}",
                    operation,
                    p.display(),
                    message
                ),
                None => write!(f, "I/O error during {}: {}", operation, message),
            },
            StorageError::NoHomeDirectory => write!(f, "Could not determine home directory"),
            StorageError::Serialization { message } => {
                write!(f, "Serialization failed: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Classify an I/O error into a StorageError.
pub fn classify_io_error(
    err: std::io::Error,
    path: Option<PathBuf>,
    operation: &str,
) -> StorageError {
    use std::io::ErrorKind;

    match (err.kind(), path) {
        (ErrorKind::PermissionDenied, Some(p)) => StorageError::PermissionDenied {
            path: p,
            operation: operation.to_string(),
        },
        (_, path) => StorageError::Io {
            operation: operation.to_string(),
            path,
            message: err.to_string(),
        },
    }
}
