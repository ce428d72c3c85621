//! Game rules for tic-tac-toe.
//!
//! This module contains pure functions for evaluating board state. Nothing
//! here performs I/O or holds state; the game store composes these into
//! its lifecycle.

pub mod draw;
pub mod legality;
pub mod win;

pub use draw::{is_draw, is_full};
pub use legality::{apply, check, is_legal};
pub use win::{check_winner, winner_of};

use super::{Board, Mark, Winner};
use tracing::instrument;

/// Evaluates the board after `mover` has just placed a mark.
///
/// Only the mover can have completed a line on this move, so the win check
/// runs for the mover first; a draw is reported only when that check fails
/// and the board is full.
#[instrument(skip(board), fields(board = %board))]
pub fn evaluate(board: &Board, mover: Mark) -> Option<Winner> {
    if check_winner(board, mover) {
        Some(Winner::from(mover))
    } else if is_full(board) {
        Some(Winner::Draw)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(moves: &[usize]) -> (Board, Option<Winner>) {
        let mut board = Board::new();
        let mut mover = Mark::X;
        let mut verdict = None;
        for &index in moves {
            board = apply(board, index, mover).expect("legal move");
            verdict = evaluate(&board, mover);
            mover = mover.opponent();
        }
        (board, verdict)
    }

    #[test]
    fn test_evaluate_undecided() {
        let (_, verdict) = play(&[0, 4]);
        assert_eq!(verdict, None);
    }

    #[test]
    fn test_evaluate_win_on_last_square_beats_draw() {
        // Ninth move fills the board and completes the left column for X.
        let (board, verdict) = play(&[0, 1, 2, 4, 3, 5, 7, 8, 6]);
        assert!(is_full(&board));
        assert_eq!(verdict, Some(Winner::X));
    }

    #[test]
    fn test_evaluate_draw() {
        let (_, verdict) = play(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert_eq!(verdict, Some(Winner::Draw));
    }
}
