//! The two backing services the gateway composes.
//!
//! The orchestrator only sees these traits. In-process deployments wrap the
//! stores directly; split deployments use the HTTP clients in
//! [`remote`](super::remote).

use async_trait::async_trait;
use tracing::instrument;

use crate::games::tictactoe::Mark;
use crate::{
    GameId, GameSnapshot, GameStore, GameSummary, MatchResult, PendingResult, Player, PlayerId,
    PlayerRegistry, RegistryError, Seat, ServiceError,
};

/// Game-state service: owns boards, turns and lifecycle.
#[async_trait]
pub trait GameService: std::fmt::Debug + Send + Sync {
    /// Creates a game with `player_x` seated.
    async fn create(&self, player_x: Seat) -> Result<GameSnapshot, ServiceError>;

    /// Seats `player_o`.
    async fn join(&self, game_id: GameId, player_o: Seat) -> Result<GameSnapshot, ServiceError>;

    /// Plays `mark` at `position`.
    async fn make_move(
        &self,
        game_id: GameId,
        mark: Mark,
        position: usize,
    ) -> Result<GameSnapshot, ServiceError>;

    /// Current snapshot of a game.
    async fn get(&self, game_id: GameId) -> Result<GameSnapshot, ServiceError>;

    /// Games waiting for an opponent.
    async fn list_waiting(&self) -> Result<Vec<GameSummary>, ServiceError>;

    /// Every game.
    async fn list_all(&self) -> Result<Vec<GameSummary>, ServiceError>;

    /// Completed-game results not yet acknowledged.
    async fn pending_results(&self) -> Result<Vec<PendingResult>, ServiceError>;

    /// Marks one side's result as recorded.
    async fn acknowledge_result(&self, game_id: GameId, mark: Mark) -> Result<(), ServiceError>;
}

/// Player-ranking service: owns identities and statistics.
#[async_trait]
pub trait RankingService: std::fmt::Debug + Send + Sync {
    /// Idempotent registration by username.
    async fn register(&self, username: &str) -> Result<PlayerId, ServiceError>;

    /// Counts one finished game for `player_id`.
    ///
    /// Idempotent per `game_id`; without one every call counts.
    async fn record_result(
        &self,
        player_id: PlayerId,
        result: MatchResult,
        opponent_id: Option<PlayerId>,
        game_id: Option<GameId>,
    ) -> Result<Player, ServiceError>;

    /// Statistics for one player.
    async fn get_stats(&self, player_id: PlayerId) -> Result<Player, ServiceError>;

    /// Statistics by username, `None` when unregistered.
    async fn find_by_username(&self, username: &str) -> Result<Option<Player>, ServiceError>;

    /// Every player.
    async fn list_all(&self) -> Result<Vec<Player>, ServiceError>;
}

/// [`GameService`] over an in-process [`GameStore`].
#[derive(Debug, Clone, Default)]
pub struct LocalGameService {
    store: GameStore,
}

impl LocalGameService {
    /// Wraps `store`.
    pub fn new(store: GameStore) -> Self {
        Self { store }
    }

    /// The wrapped store.
    pub fn store(&self) -> &GameStore {
        &self.store
    }
}

#[async_trait]
impl GameService for LocalGameService {
    async fn create(&self, player_x: Seat) -> Result<GameSnapshot, ServiceError> {
        Ok(self.store.create(player_x)?)
    }

    async fn join(&self, game_id: GameId, player_o: Seat) -> Result<GameSnapshot, ServiceError> {
        Ok(self.store.join(game_id, player_o)?)
    }

    async fn make_move(
        &self,
        game_id: GameId,
        mark: Mark,
        position: usize,
    ) -> Result<GameSnapshot, ServiceError> {
        Ok(self.store.make_move(game_id, mark, position)?)
    }

    async fn get(&self, game_id: GameId) -> Result<GameSnapshot, ServiceError> {
        Ok(self.store.get(game_id)?)
    }

    async fn list_waiting(&self) -> Result<Vec<GameSummary>, ServiceError> {
        Ok(self.store.list_waiting())
    }

    async fn list_all(&self) -> Result<Vec<GameSummary>, ServiceError> {
        Ok(self.store.list_all())
    }

    async fn pending_results(&self) -> Result<Vec<PendingResult>, ServiceError> {
        Ok(self.store.pending_results())
    }

    async fn acknowledge_result(&self, game_id: GameId, mark: Mark) -> Result<(), ServiceError> {
        Ok(self.store.acknowledge_result(game_id, mark)?)
    }
}

/// [`RankingService`] over an in-process [`PlayerRegistry`].
///
/// Registry calls may touch the filesystem, so they run on the blocking pool.
#[derive(Debug, Clone)]
pub struct LocalRankingService {
    registry: PlayerRegistry,
}

impl LocalRankingService {
    /// Wraps `registry`.
    pub fn new(registry: PlayerRegistry) -> Self {
        Self { registry }
    }

    /// The wrapped registry.
    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    #[instrument(skip(self, call))]
    async fn blocking<T, F>(&self, operation: &'static str, call: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce(PlayerRegistry) -> Result<T, RegistryError> + Send + 'static,
    {
        let registry = self.registry.clone();
        tokio::task::spawn_blocking(move || call(registry))
            .await
            .map_err(|e| ServiceError::internal(format!("{} task failed: {}", operation, e)))?
            .map_err(ServiceError::from)
    }
}

#[async_trait]
impl RankingService for LocalRankingService {
    async fn register(&self, username: &str) -> Result<PlayerId, ServiceError> {
        let username = username.to_string();
        self.blocking("register", move |r| r.register(&username)).await
    }

    async fn record_result(
        &self,
        player_id: PlayerId,
        result: MatchResult,
        opponent_id: Option<PlayerId>,
        game_id: Option<GameId>,
    ) -> Result<Player, ServiceError> {
        self.blocking("record_result", move |r| {
            r.record_result(player_id, result, opponent_id, game_id)
        })
        .await
    }

    async fn get_stats(&self, player_id: PlayerId) -> Result<Player, ServiceError> {
        self.blocking("get_stats", move |r| r.get_stats(player_id)).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Player>, ServiceError> {
        let username = username.to_string();
        self.blocking("find_by_username", move |r| r.find_by_username(&username))
            .await
    }

    async fn list_all(&self) -> Result<Vec<Player>, ServiceError> {
        self.blocking("list_all", |r| r.list_all()).await
    }
}
