//! In-memory game store with per-game locking.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use super::{Game, GameSnapshot, GameStatus, GameStoreError, GameSummary, PendingResult, Seat};
use crate::GameId;
use crate::games::tictactoe::Mark;

/// Holds every game ever created, keyed by id.
///
/// The map lock is held only to look up or insert a game; each game sits
/// behind its own mutex, so moves on one game are serialised while other
/// games proceed independently. Games are never removed.
#[derive(Debug, Clone, Default)]
pub struct GameStore {
    games: Arc<RwLock<HashMap<GameId, Arc<Mutex<Game>>>>>,
}

impl GameStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating game store");
        Self::default()
    }

    fn slot(&self, game_id: GameId) -> Result<Arc<Mutex<Game>>, GameStoreError> {
        self.games.read().get(&game_id).cloned().ok_or_else(|| {
            debug!(game_id = %game_id, "Game not found");
            GameStoreError::NotFound(game_id)
        })
    }

    /// Creates a game with `player_x` in the X seat.
    ///
    /// # Errors
    ///
    /// [`GameStoreError::InvalidInput`] for an empty name.
    #[instrument(skip(self))]
    pub fn create(&self, player_x: Seat) -> Result<GameSnapshot, GameStoreError> {
        if player_x.name().trim().is_empty() {
            warn!("Rejected game without player name");
            return Err(GameStoreError::InvalidInput("player_x name is required"));
        }
        let game = Game::new(player_x);
        let snapshot = game.snapshot();
        self.games.write().insert(game.id(), Arc::new(Mutex::new(game)));
        Ok(snapshot)
    }

    /// Seats `player_o` and starts the game.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidInput` for an empty name, `GameFull` when the O seat is taken.
    #[instrument(skip(self))]
    pub fn join(&self, game_id: GameId, player_o: Seat) -> Result<GameSnapshot, GameStoreError> {
        if player_o.name().trim().is_empty() {
            warn!("Rejected join without player name");
            return Err(GameStoreError::InvalidInput("player_o name is required"));
        }
        let slot = self.slot(game_id)?;
        let mut game = slot.lock();
        game.join(player_o)?;
        Ok(game.snapshot())
    }

    /// Plays `mark` at board index `position`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidState` unless in progress, `WrongTurn`, `IllegalMove`.
    #[instrument(skip(self))]
    pub fn make_move(
        &self,
        game_id: GameId,
        mark: Mark,
        position: usize,
    ) -> Result<GameSnapshot, GameStoreError> {
        let slot = self.slot(game_id)?;
        let mut game = slot.lock();
        game.play(mark, position)?;
        Ok(game.snapshot())
    }

    /// Returns the current snapshot of a game.
    ///
    /// # Errors
    ///
    /// `NotFound`.
    #[instrument(skip(self))]
    pub fn get(&self, game_id: GameId) -> Result<GameSnapshot, GameStoreError> {
        Ok(self.slot(game_id)?.lock().snapshot())
    }

    /// Games still waiting for an opponent, oldest first.
    #[instrument(skip(self))]
    pub fn list_waiting(&self) -> Vec<GameSummary> {
        self.summaries(|game| game.status() == GameStatus::WaitingOpponent)
    }

    /// Every game, oldest first.
    #[instrument(skip(self))]
    pub fn list_all(&self) -> Vec<GameSummary> {
        self.summaries(|_| true)
    }

    fn summaries(&self, keep: impl Fn(&Game) -> bool) -> Vec<GameSummary> {
        let games = self.games.read();
        let mut selected: Vec<_> = games
            .values()
            .filter_map(|slot| {
                let game = slot.lock();
                keep(&game).then(|| (game.created_at(), game.summary()))
            })
            .collect();
        selected.sort_by_key(|(created_at, _)| *created_at);
        debug!(count = selected.len(), "Games listed");
        selected.into_iter().map(|(_, summary)| summary).collect()
    }

    /// Per-side results of completed games not yet acknowledged.
    #[instrument(skip(self))]
    pub fn pending_results(&self) -> Vec<PendingResult> {
        let games = self.games.read();
        let mut pending: Vec<_> = games
            .values()
            .flat_map(|slot| slot.lock().pending_results())
            .collect();
        pending.sort_by_key(|p| (p.completed_at, p.mark));
        debug!(count = pending.len(), "Pending results listed");
        pending
    }

    /// Records that `mark`'s result for `game_id` reached the player registry.
    ///
    /// Acknowledging the same side twice is a no-op.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidState` if the game is not completed.
    #[instrument(skip(self))]
    pub fn acknowledge_result(&self, game_id: GameId, mark: Mark) -> Result<(), GameStoreError> {
        let slot = self.slot(game_id)?;
        let changed = slot.lock().acknowledge(mark)?;
        if !changed {
            debug!("Result already acknowledged");
        }
        Ok(())
    }

    /// Number of games held.
    pub fn len(&self) -> usize {
        self.games.read().len()
    }

    /// Whether the store holds no games.
    pub fn is_empty(&self) -> bool {
        self.games.read().is_empty()
    }
}
