//! Board engine: a pure state machine over a nine-square board.

mod position;
pub mod rules;
mod types;

pub use position::Position;
pub use rules::legality::MoveError;
pub use types::{Board, BoardParseError, Mark, Square, Winner};
