//! Draw detection logic for tic-tac-toe.

use super::super::{Board, Mark, Square};
use super::win::check_winner;
use tracing::instrument;

/// Checks if the board is full (all squares occupied).
#[instrument(skip(board), fields(board = %board))]
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

/// A draw: no empty square remains and neither mark owns a line.
#[instrument(skip(board), fields(board = %board))]
pub fn is_draw(board: &Board) -> bool {
    is_full(board) && !check_winner(board, Mark::X) && !check_winner(board, Mark::O)
}
