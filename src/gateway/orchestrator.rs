//! Composes the game and ranking services into client-facing use cases.
//!
//! The orchestrator holds no state of its own. When a move completes a game
//! it records both sides with the ranking service, then acknowledges each
//! side with the game service. A side that fails stays pending in the game
//! store and is picked up later by [`Orchestrator::reconcile`]. The move
//! itself always succeeds once the game service accepted it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use super::links::Resource;
use super::resources::{
    ApiRoot, GameCollection, GameResource, PlayerCollection, PlayerResource, RankingResource,
    RegisteredPlayer,
};
use super::services::{GameService, RankingService};
use crate::games::tictactoe::Mark;
use crate::{GameId, GameSnapshot, PendingResult, PlayerId, Seat, ServiceError};

/// Default bound on a single backing-service call.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);

/// Default age a pending result must reach before reconciliation touches it.
pub const DEFAULT_RECONCILE_GRACE: Duration = Duration::from_secs(60);

/// Upper bound on bounded upstream calls between a game completing and its
/// inline saga finishing: the move reply, then resolve twice, record and
/// acknowledge for each side.
pub const SAGA_UPSTREAM_CALLS: u32 = 9;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Sides recorded with the ranking service.
    pub recorded: usize,
    /// Sides that failed again and remain pending.
    pub failed: usize,
    /// Sides skipped as too recent.
    pub deferred: usize,
}

impl ReconcileReport {
    /// Whether the pass did nothing.
    pub fn is_idle(&self) -> bool {
        self.recorded == 0 && self.failed == 0
    }
}

/// Gateway use cases over a [`GameService`] and a [`RankingService`].
#[derive(Debug, Clone)]
pub struct Orchestrator {
    games: Arc<dyn GameService>,
    players: Arc<dyn RankingService>,
    timeout: Duration,
    reconcile_grace: Duration,
}

impl Orchestrator {
    /// Creates an orchestrator with default timeout and grace period.
    pub fn new(games: Arc<dyn GameService>, players: Arc<dyn RankingService>) -> Self {
        Self {
            games,
            players,
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
            reconcile_grace: DEFAULT_RECONCILE_GRACE,
        }
    }

    /// Overrides the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the reconciliation grace period.
    #[must_use]
    pub fn with_reconcile_grace(mut self, grace: Duration) -> Self {
        self.reconcile_grace = grace;
        self
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, ServiceError>>,
    ) -> Result<T, ServiceError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, timeout_ms = self.timeout.as_millis() as u64, "Upstream call timed out");
                Err(ServiceError::upstream(format!(
                    "{} timed out after {:?}",
                    operation, self.timeout
                )))
            }
        }
    }

    /// Entry point links.
    pub fn api_root(&self) -> ApiRoot {
        ApiRoot::default()
    }

    /// Registers `player_name` (idempotently) and creates a game with them as X.
    ///
    /// A registration that succeeds before game creation fails is kept.
    #[instrument(skip(self))]
    pub async fn create_game(&self, player_name: &str) -> Result<GameResource, ServiceError> {
        let name = required_name(player_name)?;
        let player_id = self
            .bounded("register_player", self.players.register(name))
            .await?;
        let game = self
            .bounded("create_game", self.games.create(Seat::registered(name, player_id)))
            .await?;
        info!(game_id = %game.id, %player_id, "Game created");
        Ok(GameResource::new(game).relate("player", Resource::Player(player_id)))
    }

    /// Registers `player_name` and seats them as O.
    #[instrument(skip(self))]
    pub async fn join_game(
        &self,
        game_id: GameId,
        player_name: &str,
    ) -> Result<GameResource, ServiceError> {
        let name = required_name(player_name)?;
        let player_id = self
            .bounded("register_player", self.players.register(name))
            .await?;
        let game = self
            .bounded("join_game", self.games.join(game_id, Seat::registered(name, player_id)))
            .await?;
        info!(%game_id, %player_id, "Player joined");
        Ok(GameResource::new(game).relate("player", Resource::Player(player_id)))
    }

    /// Plays a move. When it completes the game, records the outcome.
    ///
    /// Recording failures never fail the move; they leave the result pending.
    #[instrument(skip(self))]
    pub async fn make_move(
        &self,
        game_id: GameId,
        mark: Mark,
        position: usize,
    ) -> Result<GameResource, ServiceError> {
        let game = self
            .bounded("make_move", self.games.make_move(game_id, mark, position))
            .await?;
        debug!(board = %game.board, status = %game.status, "Move applied");

        if game.winner.is_none() {
            return Ok(GameResource::new(game));
        }

        info!(%game_id, winner = ?game.winner, "Game completed, recording results");
        let recorded = self.record_outcome(&game).await;
        let mut resource = GameResource::new(game);
        for (mark, player_id) in recorded {
            let rel = match mark {
                Mark::X => "player_x_stats",
                Mark::O => "player_o_stats",
            };
            resource = resource.relate(rel, Resource::Player(player_id));
        }
        Ok(resource)
    }

    /// Current state of a game.
    #[instrument(skip(self))]
    pub async fn get_game(&self, game_id: GameId) -> Result<GameResource, ServiceError> {
        let game = self.bounded("get_game", self.games.get(game_id)).await?;
        Ok(GameResource::new(game))
    }

    /// All games, or only those waiting for an opponent.
    #[instrument(skip(self))]
    pub async fn list_games(&self, waiting_only: bool) -> Result<GameCollection, ServiceError> {
        let games = if waiting_only {
            self.bounded("list_waiting", self.games.list_waiting()).await?
        } else {
            self.bounded("list_games", self.games.list_all()).await?
        };
        Ok(games.into_iter().collect())
    }

    /// Registers a username.
    #[instrument(skip(self))]
    pub async fn register_player(&self, username: &str) -> Result<RegisteredPlayer, ServiceError> {
        let name = required_name(username)?;
        let player_id = self
            .bounded("register_player", self.players.register(name))
            .await?;
        Ok(RegisteredPlayer::new(player_id, name))
    }

    /// Statistics for one player.
    #[instrument(skip(self))]
    pub async fn get_player(&self, player_id: PlayerId) -> Result<PlayerResource, ServiceError> {
        let player = self
            .bounded("get_player", self.players.get_stats(player_id))
            .await?;
        Ok(PlayerResource::from(player))
    }

    /// Every player.
    #[instrument(skip(self))]
    pub async fn list_players(&self) -> Result<PlayerCollection, ServiceError> {
        let players = self.bounded("list_players", self.players.list_all()).await?;
        Ok(players.into_iter().collect())
    }

    /// Games won by `name`; 0 when the name is not registered.
    #[instrument(skip(self))]
    pub async fn query_ranking(&self, name: &str) -> Result<RankingResource, ServiceError> {
        let player = self
            .bounded("query_ranking", self.players.find_by_username(name))
            .await?;
        Ok(RankingResource::new(name, player.as_ref()))
    }

    /// Records pending results older than the grace period.
    ///
    /// Fails only when the pending list itself cannot be fetched.
    #[instrument(skip(self))]
    pub async fn reconcile(&self) -> Result<ReconcileReport, ServiceError> {
        let pending = self
            .bounded("pending_results", self.games.pending_results())
            .await?;
        let grace = chrono::Duration::from_std(self.reconcile_grace)
            .unwrap_or_else(|_| chrono::Duration::zero());
        let cutoff = Utc::now() - grace;

        let mut report = ReconcileReport::default();
        for side in &pending {
            if side.completed_at > cutoff {
                report.deferred += 1;
                continue;
            }
            match self.settle_side(side).await {
                Ok(_) => report.recorded += 1,
                Err(e) => {
                    warn!(game_id = %side.game_id, mark = %side.mark, error = %e, "Result still unrecorded");
                    report.failed += 1;
                }
            }
        }

        if !report.is_idle() {
            info!(
                recorded = report.recorded,
                failed = report.failed,
                deferred = report.deferred,
                "Reconciliation pass finished"
            );
        }
        Ok(report)
    }

    /// Records both sides of a completed game, returning the sides recorded.
    async fn record_outcome(&self, game: &GameSnapshot) -> Vec<(Mark, PlayerId)> {
        let mut recorded = Vec::new();
        for side in PendingResult::settle(game) {
            match self.settle_side(&side).await {
                Ok(player_id) => recorded.push((side.mark, player_id)),
                Err(e) => warn!(
                    game_id = %side.game_id,
                    mark = %side.mark,
                    error = %e,
                    "Failed to record result, left pending for reconciliation"
                ),
            }
        }
        recorded
    }

    /// Records one side with the ranking service, then acknowledges it.
    ///
    /// The record carries the game id, so replaying a side that was counted
    /// but never acknowledged leaves the counters alone.
    #[instrument(skip(self, side), fields(game_id = %side.game_id, mark = %side.mark))]
    async fn settle_side(&self, side: &PendingResult) -> Result<PlayerId, ServiceError> {
        let player_id = self.resolve(&side.player).await?;
        let opponent_id = self.resolve(&side.opponent).await?;

        self.bounded(
            "record_result",
            self.players.record_result(
                player_id,
                side.result,
                Some(opponent_id),
                Some(side.game_id),
            ),
        )
        .await?;
        debug!(%player_id, result = %side.result, "Result recorded");

        if let Err(e) = self
            .bounded(
                "acknowledge_result",
                self.games.acknowledge_result(side.game_id, side.mark),
            )
            .await
        {
            warn!(error = %e, "Result recorded but not acknowledged");
        }
        Ok(player_id)
    }

    async fn resolve(&self, seat: &Seat) -> Result<PlayerId, ServiceError> {
        match seat.player_id() {
            Some(id) => Ok(*id),
            None => {
                self.bounded("register_player", self.players.register(seat.name()))
                    .await
            }
        }
    }
}

fn required_name(name: &str) -> Result<&str, ServiceError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::invalid_input("player name is required"));
    }
    Ok(trimmed)
}
