//! Core domain types for tic-tac-toe.

use super::position::Position;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Symbol a player marks the board with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub enum Mark {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Mark {
    /// Returns the opponent's mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Wire character for this mark.
    pub fn as_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a mark.
    Occupied(Mark),
}

/// Final verdict of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Winner {
    /// X completed a line.
    X,
    /// O completed a line.
    O,
    /// Board filled with no line completed.
    #[display("DRAW")]
    Draw,
}

impl Winner {
    /// The winning mark, if the game was not drawn.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Winner::X => Some(Mark::X),
            Winner::O => Some(Mark::O),
            Winner::Draw => None,
        }
    }
}

impl From<Mark> for Winner {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Winner::X,
            Mark::O => Winner::O,
        }
    }
}

/// 3x3 tic-tac-toe board.
///
/// On the wire a board is a nine character string in row-major order using
/// `X`, `O` and `-` for an empty square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Gets the square at a raw index, `None` when out of range.
    pub fn get_index(&self, index: usize) -> Option<Square> {
        self.squares.get(index).copied()
    }

    /// Sets the square at the given position.
    pub(crate) fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Number of occupied squares.
    pub fn occupied(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Formats the board as a human-readable grid.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => (pos + 1).to_string(),
                    Square::Occupied(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Board string was not nine `X`/`O`/`-` characters.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid board encoding '{}'", encoded)]
pub struct BoardParseError {
    encoded: String,
}

impl From<Board> for String {
    fn from(board: Board) -> Self {
        board
            .squares
            .iter()
            .map(|square| match square {
                Square::Empty => '-',
                Square::Occupied(mark) => mark.as_char(),
            })
            .collect()
    }
}

impl TryFrom<String> for Board {
    type Error = BoardParseError;

    fn try_from(encoded: String) -> Result<Self, Self::Error> {
        let invalid = || BoardParseError {
            encoded: encoded.clone(),
        };
        if encoded.chars().count() != 9 {
            return Err(invalid());
        }
        let mut board = Board::new();
        for (index, ch) in encoded.chars().enumerate() {
            board.squares[index] = match ch {
                '-' => Square::Empty,
                'X' => Square::Occupied(Mark::X),
                'O' => Square::Occupied(Mark::O),
                _ => return Err(invalid()),
            };
        }
        Ok(board)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_wire_encoding() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Square::Occupied(Mark::X));
        board.set(Position::Center, Square::Occupied(Mark::O));
        assert_eq!(board.to_string(), "X---O----");

        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(json, "\"X---O----\"");
    }

    #[test]
    fn test_board_rejects_bad_encoding() {
        assert!(Board::try_from("XO".to_string()).is_err());
        assert!(Board::try_from("XO--?----".to_string()).is_err());
        assert!(serde_json::from_str::<Board>("\"----------\"").is_err());
    }

    #[test]
    fn test_winner_wire_names() {
        assert_eq!(serde_json::to_string(&Winner::Draw).unwrap(), "\"DRAW\"");
        assert_eq!(serde_json::to_string(&Winner::X).unwrap(), "\"X\"");
        assert_eq!(Winner::from(Mark::O).mark(), Some(Mark::O));
    }
}
