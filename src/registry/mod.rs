//! Player registry: identity by username plus win/loss/draw statistics.

mod error;
mod models;
mod service;
mod storage;

pub use error::{RegistryError, StorageError};
pub use models::{MatchResult, Player, PlayerStats};
pub use service::PlayerRegistry;
pub use storage::{JsonFileStorage, MemoryStorage, PlayerStorage};
