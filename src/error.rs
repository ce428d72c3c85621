//! Stable error taxonomy shared by every service boundary.
//!
//! Component errors ([`MoveError`](crate::MoveError),
//! [`GameStoreError`](crate::GameStoreError), [`RegistryError`](crate::RegistryError))
//! are typed enums; each maps onto one [`ErrorKind`]. Across a service seam
//! they travel as a [`ServiceError`], which keeps the kind intact so the
//! gateway can hand it to the client unchanged.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Stable, machine-readable error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, strum::EnumIter)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Unknown game or player id.
    #[display("not found")]
    NotFound,
    /// Request payload failed validation (empty name, bad symbol).
    #[display("invalid input")]
    InvalidInput,
    /// Operation not valid for the current lifecycle state.
    #[display("invalid state")]
    InvalidState,
    /// The mover's symbol is not the one whose turn it is.
    #[display("wrong turn")]
    WrongTurn,
    /// Position out of range or already occupied.
    #[display("illegal move")]
    IllegalMove,
    /// Joining a full game.
    #[display("conflict")]
    Conflict,
    /// A backing service call failed or timed out.
    #[display("upstream unavailable")]
    UpstreamUnavailable,
    /// Storage or other unexpected internal failure.
    #[display("internal error")]
    Internal,
}

impl ErrorKind {
    /// Whether the caller caused the error (as opposed to infrastructure).
    pub fn is_client_error(self) -> bool {
        !matches!(self, Self::UpstreamUnavailable | Self::Internal)
    }
}

/// Error as carried across a service boundary: a kind plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, Serialize, Deserialize)]
#[display("{kind}: {message}")]
pub struct ServiceError {
    kind: ErrorKind,
    message: String,
}

impl ServiceError {
    /// Creates a new service error.
    #[instrument(skip(message))]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for [`ErrorKind::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Shorthand for [`ErrorKind::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    /// Shorthand for [`ErrorKind::UpstreamUnavailable`].
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamUnavailable, message)
    }

    /// Shorthand for [`ErrorKind::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
