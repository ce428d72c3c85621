//! Move legality and application.

use super::super::{Board, Mark, Position, Square, Winner};
use derive_more::Display;
use tracing::{instrument, warn};

use crate::ErrorKind;

/// Why the board engine rejected a move.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum MoveError {
    /// Index outside 0-8.
    #[display("Position {} is out of bounds (must be 0-8)", _0)]
    OutOfBounds(usize),

    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// A winner has already been recorded.
    #[display("Game is already over")]
    GameOver,
}

impl std::error::Error for MoveError {}

impl MoveError {
    /// Stable kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MoveError::OutOfBounds(_) | MoveError::SquareOccupied(_) => ErrorKind::IllegalMove,
            MoveError::GameOver => ErrorKind::InvalidState,
        }
    }
}

/// Checks a move without side effects.
///
/// Legal when `index` is 0-8, the square is empty, and no winner is recorded.
#[instrument(skip(board), fields(board = %board))]
pub fn is_legal(board: &Board, index: usize, winner: Option<Winner>) -> bool {
    check(board, index, winner).is_ok()
}

/// Places `mark` at `index` and returns the mutated board.
///
/// Callers are expected to check [`is_legal`] first; an illegal position is
/// reported as an error and the board is dropped untouched.
#[instrument(skip(board), fields(board = %board))]
pub fn apply(mut board: Board, index: usize, mark: Mark) -> Result<Board, MoveError> {
    let pos = check(&board, index, None).inspect_err(|e| {
        warn!(index, error = %e, "Rejected move application");
    })?;
    board.set(pos, Square::Occupied(mark));
    Ok(board)
}

/// Like [`is_legal`], but says why a move is rejected.
pub fn check(board: &Board, index: usize, winner: Option<Winner>) -> Result<Position, MoveError> {
    let pos = Position::from_index(index).ok_or(MoveError::OutOfBounds(index))?;
    if !board.is_empty(pos) {
        return Err(MoveError::SquareOccupied(pos));
    }
    if winner.is_some() {
        return Err(MoveError::GameOver);
    }
    Ok(pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_on_empty_board() {
        let board = Board::new();
        assert!((0..9).all(|i| is_legal(&board, i, None)));
    }

    #[test]
    fn test_out_of_bounds_is_illegal() {
        let board = Board::new();
        assert!(!is_legal(&board, 9, None));
        assert_eq!(apply(board, 9, Mark::X), Err(MoveError::OutOfBounds(9)));
    }

    #[test]
    fn test_occupied_square_is_illegal() {
        let board = apply(Board::new(), 4, Mark::X).unwrap();
        assert!(!is_legal(&board, 4, None));
        let err = apply(board, 4, Mark::O).unwrap_err();
        assert_eq!(err, MoveError::SquareOccupied(Position::Center));
        assert_eq!(err.kind(), ErrorKind::IllegalMove);
    }

    #[test]
    fn test_recorded_winner_blocks_moves() {
        let board = Board::new();
        assert!(!is_legal(&board, 0, Some(Winner::X)));
        assert!(!is_legal(&board, 0, Some(Winner::Draw)));
    }

    #[test]
    fn test_apply_sets_only_target_square() {
        let board = apply(Board::new(), 2, Mark::O).unwrap();
        assert_eq!(board.to_string(), "--O------");
        assert_eq!(board.occupied(), 1);
    }
}
