//! Player registry business logic.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use super::{MatchResult, MemoryStorage, Player, PlayerStorage, RegistryError};
use crate::{GameId, PlayerId};

/// Identity store keyed by username, with cumulative result counters.
///
/// Registration is idempotent by username (case-sensitive). Result
/// recording is idempotent per game id; a call without one counts one more
/// game every time.
#[derive(Debug, Clone)]
pub struct PlayerRegistry {
    storage: Arc<dyn PlayerStorage>,
    // Serialises every read-modify-write of the backing store.
    write_lock: Arc<Mutex<()>>,
}

impl PlayerRegistry {
    /// Creates a registry over the given storage.
    #[instrument(skip(storage), fields(storage = ?storage))]
    pub fn new(storage: impl PlayerStorage + 'static) -> Self {
        info!("Creating PlayerRegistry");
        Self {
            storage: Arc::new(storage),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Creates a registry backed by process memory.
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Returns the existing id for `username`, or creates a player with zeroed counters.
    ///
    /// # Errors
    ///
    /// [`RegistryError::InvalidInput`] for an empty username, or a storage failure.
    #[instrument(skip(self))]
    pub fn register(&self, username: &str) -> Result<PlayerId, RegistryError> {
        if username.trim().is_empty() {
            warn!("Rejected empty username");
            return Err(RegistryError::InvalidInput("username is required"));
        }

        let _guard = self.write_lock.lock();
        let mut players = self.storage.load()?;

        if let Some(existing) = players.iter().find(|p| p.username() == username) {
            debug!(player_id = %existing.player_id(), "Existing player found");
            return Ok(*existing.player_id());
        }

        let player = Player::new(username.to_string());
        let player_id = *player.player_id();
        players.push(player);
        self.storage.save(&players)?;

        info!(player_id = %player_id, "Player registered");
        Ok(player_id)
    }

    /// Counts one finished game for `player_id`.
    ///
    /// `opponent_id` is a cross-reference only: it must name a known player
    /// but the opponent's counters are left alone. With a `game_id`, a second
    /// call for the same game returns the stored record unchanged.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if either id is unknown, or a storage failure.
    #[instrument(skip(self))]
    pub fn record_result(
        &self,
        player_id: PlayerId,
        result: MatchResult,
        opponent_id: Option<PlayerId>,
        game_id: Option<GameId>,
    ) -> Result<Player, RegistryError> {
        let _guard = self.write_lock.lock();
        let mut players = self.storage.load()?;

        if let Some(opponent) = opponent_id
            && !players.iter().any(|p| *p.player_id() == opponent)
        {
            warn!(opponent_id = %opponent, "Unknown opponent");
            return Err(RegistryError::NotFound(opponent));
        }

        let player = players
            .iter_mut()
            .find(|p| *p.player_id() == player_id)
            .ok_or_else(|| {
                warn!("Unknown player");
                RegistryError::NotFound(player_id)
            })?;
        let counted = match game_id {
            Some(game_id) => player.record_game(game_id, result),
            None => {
                player.record(result);
                true
            }
        };
        let updated = player.clone();
        if !counted {
            info!("Result already recorded for this game");
            return Ok(updated);
        }

        self.storage.save(&players)?;
        info!(
            username = %updated.username(),
            games_played = updated.games_played(),
            "Game result recorded"
        );
        Ok(updated)
    }

    /// Returns the stored record for `player_id`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] if the id is unknown, or a storage failure.
    #[instrument(skip(self))]
    pub fn get_stats(&self, player_id: PlayerId) -> Result<Player, RegistryError> {
        self.storage
            .load()?
            .into_iter()
            .find(|p| *p.player_id() == player_id)
            .ok_or(RegistryError::NotFound(player_id))
    }

    /// Looks a player up by exact username.
    ///
    /// # Errors
    ///
    /// Storage failure only; an unknown name is `Ok(None)`.
    #[instrument(skip(self))]
    pub fn find_by_username(&self, username: &str) -> Result<Option<Player>, RegistryError> {
        let found = self
            .storage
            .load()?
            .into_iter()
            .find(|p| p.username() == username);
        debug!(found = found.is_some(), "Username lookup");
        Ok(found)
    }

    /// Lists every player in registration order.
    ///
    /// # Errors
    ///
    /// Storage failure.
    #[instrument(skip(self))]
    pub fn list_all(&self) -> Result<Vec<Player>, RegistryError> {
        let players = self.storage.load()?;
        debug!(count = players.len(), "Players listed");
        Ok(players)
    }
}
