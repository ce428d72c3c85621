//! Game store: active and finished games keyed by id.

mod error;
mod game;
mod settlement;
mod store;

pub use error::GameStoreError;
pub use game::{Game, GameSnapshot, GameStatus, GameSummary, Seat};
pub use settlement::PendingResult;
pub use store::GameStore;
