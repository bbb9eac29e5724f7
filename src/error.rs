//! Error types for the storage edges (settings and high score).
//!
//! The simulation itself has no error paths.

use std::fmt;
use std::io;

/// Failure reading or writing persisted data
#[derive(Debug)]
pub enum StorageError {
    /// Filesystem access failed
    Io(io::Error),
    /// Stored data was not valid JSON for the expected shape
    Json(serde_json::Error),
    /// No backing store on this platform (e.g. LocalStorage disabled)
    Unavailable(&'static str),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "storage i/o error: {err}"),
            StorageError::Json(err) => write!(f, "malformed stored data: {err}"),
            StorageError::Unavailable(what) => write!(f, "storage unavailable: {what}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            StorageError::Json(err) => Some(err),
            StorageError::Unavailable(_) => None,
        }
    }
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Json(err)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
