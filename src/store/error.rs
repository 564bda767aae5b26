//! Errors raised by the snapshot store

use std::io;

use thiserror::Error;

use crate::utils::AtomicError;

/// Result type for SnapshotStore operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in SnapshotStore operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Backup not found: {0}")]
    NotFound(String),

    #[error("Backup {filename} is corrupted: {source}")]
    CorruptData {
        filename: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid backup name: {0}")]
    InvalidName(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<AtomicError> for StoreError {
    fn from(e: AtomicError) -> Self {
        match e {
            AtomicError::Io(e) => StoreError::Io(e),
            AtomicError::AlreadyExists(path) => StoreError::Io(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            )),
        }
    }
}
