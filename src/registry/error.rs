//! Player registry error types.

use derive_more::{Display, Error};
use tracing::instrument;

use crate::{ErrorKind, PlayerId, ServiceError};

/// Storage failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Storage error: {} at {}:{}", message, file, line)]
pub struct StorageError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StorageError {
    /// Creates a new storage error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for StorageError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for StorageError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Corrupt player data: {}", err))
    }
}

/// Error returned by [`PlayerRegistry`](crate::PlayerRegistry) operations.
#[derive(Debug, Clone, Display)]
pub enum RegistryError {
    /// No player with this id.
    #[display("Player {} not found", _0)]
    NotFound(PlayerId),

    /// Rejected input (empty username).
    #[display("{}", _0)]
    InvalidInput(&'static str),

    /// Backing storage failed.
    #[display("{}", _0)]
    Storage(StorageError),
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl RegistryError {
    /// Stable kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::NotFound(_) => ErrorKind::NotFound,
            RegistryError::InvalidInput(_) => ErrorKind::InvalidInput,
            RegistryError::Storage(_) => ErrorKind::Internal,
        }
    }
}

impl From<StorageError> for RegistryError {
    fn from(err: StorageError) -> Self {
        RegistryError::Storage(err)
    }
}

impl From<RegistryError> for ServiceError {
    fn from(err: RegistryError) -> Self {
        ServiceError::new(err.kind(), err.to_string())
    }
}
