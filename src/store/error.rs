//! Game store error types.

use derive_more::Display;

use super::GameStatus;
use crate::games::tictactoe::{Mark, MoveError};
use crate::{ErrorKind, GameId, ServiceError};

/// Error returned by [`GameStore`](crate::GameStore) operations.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GameStoreError {
    /// No game with this id.
    #[display("Game {} not found", _0)]
    NotFound(GameId),

    /// Operation not valid in the game's lifecycle state.
    #[display("Game {} is {}: {}", game_id, status, reason)]
    InvalidState {
        /// Game the operation targeted.
        game_id: GameId,
        /// Status at the time of the call.
        status: GameStatus,
        /// Short explanation.
        reason: &'static str,
    },

    /// The mover's mark is not the current turn.
    #[display("Not {}'s turn, waiting for {}", got, expected)]
    WrongTurn {
        /// Mark whose turn it is.
        expected: Mark,
        /// Mark that tried to move.
        got: Mark,
    },

    /// The board engine rejected the position.
    #[display("Illegal move: {}", _0)]
    IllegalMove(MoveError),

    /// Both seats are taken.
    #[display("Game {} is full", _0)]
    GameFull(GameId),

    /// Rejected request input.
    #[display("{}", _0)]
    InvalidInput(&'static str),
}

impl std::error::Error for GameStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameStoreError::IllegalMove(err) => Some(err),
            _ => None,
        }
    }
}

impl GameStoreError {
    /// Stable kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameStoreError::NotFound(_) => ErrorKind::NotFound,
            GameStoreError::InvalidState { .. } => ErrorKind::InvalidState,
            GameStoreError::WrongTurn { .. } => ErrorKind::WrongTurn,
            GameStoreError::IllegalMove(err) => err.kind(),
            GameStoreError::GameFull(_) => ErrorKind::Conflict,
            GameStoreError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }
}

impl From<MoveError> for GameStoreError {
    fn from(err: MoveError) -> Self {
        GameStoreError::IllegalMove(err)
    }
}

impl From<GameStoreError> for ServiceError {
    fn from(err: GameStoreError) -> Self {
        ServiceError::new(err.kind(), err.to_string())
    }
}
