//! Tests for the gateway use cases and the result-recording saga.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tictactoe_gateway::{
    ErrorKind, GameId, GameStatus, GameStore, HttpGameService, LocalGameService,
    LocalRankingService, Mark, MatchResult, Orchestrator, Player, PlayerId, PlayerRegistry,
    RankingService, ServiceError, Winner,
};

/// Ranking service whose `record_result` can be switched off.
#[derive(Debug)]
struct FlakyRanking {
    inner: LocalRankingService,
    recording_down: AtomicBool,
}

impl FlakyRanking {
    fn new(registry: PlayerRegistry) -> Self {
        Self {
            inner: LocalRankingService::new(registry),
            recording_down: AtomicBool::new(false),
        }
    }

    fn set_recording_down(&self, down: bool) {
        self.recording_down.store(down, Ordering::SeqCst);
    }
}

#[async_trait]
impl RankingService for FlakyRanking {
    async fn register(&self, username: &str) -> Result<PlayerId, ServiceError> {
        self.inner.register(username).await
    }

    async fn record_result(
        &self,
        player_id: PlayerId,
        result: MatchResult,
        opponent_id: Option<PlayerId>,
        game_id: Option<GameId>,
    ) -> Result<Player, ServiceError> {
        if self.recording_down.load(Ordering::SeqCst) {
            return Err(ServiceError::upstream("player service unavailable"));
        }
        self.inner
            .record_result(player_id, result, opponent_id, game_id)
            .await
    }

    async fn get_stats(&self, player_id: PlayerId) -> Result<Player, ServiceError> {
        self.inner.get_stats(player_id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Player>, ServiceError> {
        self.inner.find_by_username(username).await
    }

    async fn list_all(&self) -> Result<Vec<Player>, ServiceError> {
        self.inner.list_all().await
    }
}

/// Ranking service that never answers in time.
#[derive(Debug)]
struct StalledRanking;

#[async_trait]
impl RankingService for StalledRanking {
    async fn register(&self, _username: &str) -> Result<PlayerId, ServiceError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(PlayerId::generate())
    }

    async fn record_result(
        &self,
        _player_id: PlayerId,
        _result: MatchResult,
        _opponent_id: Option<PlayerId>,
        _game_id: Option<GameId>,
    ) -> Result<Player, ServiceError> {
        Err(ServiceError::upstream("stalled"))
    }

    async fn get_stats(&self, _player_id: PlayerId) -> Result<Player, ServiceError> {
        Err(ServiceError::upstream("stalled"))
    }

    async fn find_by_username(&self, _username: &str) -> Result<Option<Player>, ServiceError> {
        Err(ServiceError::upstream("stalled"))
    }

    async fn list_all(&self) -> Result<Vec<Player>, ServiceError> {
        Err(ServiceError::upstream("stalled"))
    }
}

/// Ranking service that applies every write but replies too late.
#[derive(Debug)]
struct LateReplyRanking {
    inner: LocalRankingService,
    delay: Duration,
}

#[async_trait]
impl RankingService for LateReplyRanking {
    async fn register(&self, username: &str) -> Result<PlayerId, ServiceError> {
        self.inner.register(username).await
    }

    async fn record_result(
        &self,
        player_id: PlayerId,
        result: MatchResult,
        opponent_id: Option<PlayerId>,
        game_id: Option<GameId>,
    ) -> Result<Player, ServiceError> {
        let stored = self
            .inner
            .record_result(player_id, result, opponent_id, game_id)
            .await;
        tokio::time::sleep(self.delay).await;
        stored
    }

    async fn get_stats(&self, player_id: PlayerId) -> Result<Player, ServiceError> {
        self.inner.get_stats(player_id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Player>, ServiceError> {
        self.inner.find_by_username(username).await
    }

    async fn list_all(&self) -> Result<Vec<Player>, ServiceError> {
        self.inner.list_all().await
    }
}

struct Harness {
    store: GameStore,
    registry: PlayerRegistry,
    ranking: Arc<FlakyRanking>,
    orchestrator: Orchestrator,
}

fn harness() -> Harness {
    let store = GameStore::new();
    let registry = PlayerRegistry::in_memory();
    let ranking = Arc::new(FlakyRanking::new(registry.clone()));
    let orchestrator = Orchestrator::new(
        Arc::new(LocalGameService::new(store.clone())),
        ranking.clone(),
    )
    .with_reconcile_grace(Duration::ZERO);
    Harness {
        store,
        registry,
        ranking,
        orchestrator,
    }
}

async fn started(orchestrator: &Orchestrator) -> GameId {
    let game = orchestrator.create_game("Ana").await.expect("Create failed");
    orchestrator
        .join_game(game.game.id, "Bea")
        .await
        .expect("Join failed");
    game.game.id
}

async fn play(orchestrator: &Orchestrator, id: GameId, moves: &[usize]) {
    let mut mark = Mark::X;
    for &position in moves {
        orchestrator
            .make_move(id, mark, position)
            .await
            .expect("Move failed");
        mark = mark.opponent();
    }
}

fn stats(registry: &PlayerRegistry, name: &str) -> Player {
    registry
        .find_by_username(name)
        .expect("Lookup failed")
        .expect("Player missing")
}

#[tokio::test]
async fn test_create_game_registers_player_and_links() {
    let h = harness();
    let game = h.orchestrator.create_game("Ana").await.expect("Create failed");

    assert_eq!(game.game.status, GameStatus::WaitingOpponent);
    let ana = stats(&h.registry, "Ana");
    assert_eq!(game.game.player_x_id, Some(*ana.player_id()));
    for rel in ["self", "join", "move", "player"] {
        assert!(game.links.get(rel).is_some(), "missing {} link", rel);
    }
    assert_eq!(
        game.links.get("join").expect("join link").href,
        format!("/api/games/{}/join", game.game.id)
    );
}

#[tokio::test]
async fn test_top_row_win_records_both_sides() {
    let h = harness();
    let id = started(&h.orchestrator).await;

    let mut mark = Mark::X;
    let mut last = None;
    for position in [0, 3, 1, 4, 2] {
        last = Some(
            h.orchestrator
                .make_move(id, mark, position)
                .await
                .expect("Move failed"),
        );
        mark = mark.opponent();
    }
    let last = last.expect("No moves played");

    assert_eq!(last.game.status, GameStatus::Completed);
    assert_eq!(last.game.winner, Some(Winner::X));
    assert!(last.links.get("player_x_stats").is_some());
    assert!(last.links.get("player_o_stats").is_some());

    let ana = stats(&h.registry, "Ana");
    let bea = stats(&h.registry, "Bea");
    assert_eq!(*ana.games_won(), 1);
    assert_eq!(*ana.games_played(), 1);
    assert_eq!(*bea.games_lost(), 1);
    assert_eq!(*bea.games_played(), 1);
    assert!(h.store.pending_results().is_empty());
}

#[tokio::test]
async fn test_draw_records_draw_for_both() {
    let h = harness();
    let id = started(&h.orchestrator).await;
    play(&h.orchestrator, id, &[0, 1, 2, 4, 3, 5, 7, 6, 8]).await;

    let game = h.orchestrator.get_game(id).await.expect("Get failed");
    assert_eq!(game.game.winner, Some(Winner::Draw));
    assert_eq!(*stats(&h.registry, "Ana").games_drawn(), 1);
    assert_eq!(*stats(&h.registry, "Bea").games_drawn(), 1);
}

#[tokio::test]
async fn test_game_errors_keep_their_kind() {
    let h = harness();
    let id = started(&h.orchestrator).await;
    play(&h.orchestrator, id, &[4]).await;

    let err = h.orchestrator.make_move(id, Mark::X, 0).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WrongTurn);

    let err = h.orchestrator.make_move(id, Mark::O, 4).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalMove);

    let err = h.orchestrator.join_game(id, "Cid").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let err = h.orchestrator.get_game(GameId::generate()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_blank_name_is_invalid_input() {
    let h = harness();
    let err = h.orchestrator.create_game("   ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(h.registry.list_all().expect("List failed").is_empty());
}

#[tokio::test]
async fn test_unknown_ranking_is_zero() {
    let h = harness();
    let ranking = h.orchestrator.query_ranking("Nobody").await.expect("Query failed");
    assert_eq!(ranking.ranking, 0);
    assert_eq!(ranking.name, "Nobody");
}

#[tokio::test]
async fn test_ranking_counts_wins() {
    let h = harness();
    let id = started(&h.orchestrator).await;
    play(&h.orchestrator, id, &[0, 3, 1, 4, 2]).await;

    let ranking = h.orchestrator.query_ranking("Ana").await.expect("Query failed");
    assert_eq!(ranking.ranking, 1);
    assert!(ranking.links.get("player").is_some());
    assert_eq!(
        h.orchestrator.query_ranking("Bea").await.expect("Query failed").ranking,
        0
    );
}

#[tokio::test]
async fn test_recording_failure_does_not_fail_move() {
    let h = harness();
    let id = started(&h.orchestrator).await;
    play(&h.orchestrator, id, &[0, 3, 1, 4]).await;

    h.ranking.set_recording_down(true);
    let game = h
        .orchestrator
        .make_move(id, Mark::X, 2)
        .await
        .expect("Winning move must succeed");
    assert_eq!(game.game.winner, Some(Winner::X));
    assert!(game.links.get("player_x_stats").is_none());
    assert_eq!(*stats(&h.registry, "Ana").games_played(), 0);
    assert_eq!(h.store.pending_results().len(), 2);
}

#[tokio::test]
async fn test_reconcile_records_leftover_results_once() {
    let h = harness();
    let id = started(&h.orchestrator).await;
    h.ranking.set_recording_down(true);
    play(&h.orchestrator, id, &[0, 3, 1, 4, 2]).await;

    let report = h.orchestrator.reconcile().await.expect("Reconcile failed");
    assert_eq!(report.recorded, 0);
    assert_eq!(report.failed, 2);

    h.ranking.set_recording_down(false);
    let report = h.orchestrator.reconcile().await.expect("Reconcile failed");
    assert_eq!(report.recorded, 2);
    assert_eq!(report.failed, 0);
    assert!(h.store.pending_results().is_empty());

    let report = h.orchestrator.reconcile().await.expect("Reconcile failed");
    assert!(report.is_idle());
    assert_eq!(*stats(&h.registry, "Ana").games_won(), 1);
    assert_eq!(*stats(&h.registry, "Bea").games_lost(), 1);
}

#[tokio::test]
async fn test_reconcile_defers_recent_results() {
    let h = harness();
    let orchestrator = h
        .orchestrator
        .clone()
        .with_reconcile_grace(Duration::from_secs(3600));
    let id = started(&orchestrator).await;
    h.ranking.set_recording_down(true);
    play(&orchestrator, id, &[0, 3, 1, 4, 2]).await;
    h.ranking.set_recording_down(false);

    let report = orchestrator.reconcile().await.expect("Reconcile failed");
    assert_eq!(report.deferred, 2);
    assert!(report.is_idle());
    assert_eq!(h.store.pending_results().len(), 2);
}

#[tokio::test]
async fn test_stalled_ranking_times_out() {
    let orchestrator = Orchestrator::new(
        Arc::new(LocalGameService::new(GameStore::new())),
        Arc::new(StalledRanking),
    )
    .with_timeout(Duration::from_millis(50));

    let err = orchestrator.create_game("Ana").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
}

#[tokio::test]
async fn test_registration_survives_failed_creation() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Bind failed");
    let addr = listener.local_addr().expect("No local addr");
    drop(listener);

    let registry = PlayerRegistry::in_memory();
    let games = HttpGameService::new(&format!("http://{}", addr), Duration::from_millis(500))
        .expect("Client failed");
    let orchestrator = Orchestrator::new(
        Arc::new(games),
        Arc::new(LocalRankingService::new(registry.clone())),
    );

    let err = orchestrator.create_game("Ana").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
    assert!(registry.find_by_username("Ana").expect("Lookup failed").is_some());
}

#[tokio::test]
async fn test_players_and_games_listing() {
    let h = harness();
    let waiting = h.orchestrator.create_game("Ana").await.expect("Create failed");
    started(&h.orchestrator).await;

    let all = h.orchestrator.list_games(false).await.expect("List failed");
    assert_eq!(all.games.len(), 2);
    let open = h.orchestrator.list_games(true).await.expect("List failed");
    assert_eq!(open.games.len(), 1);
    assert_eq!(open.games[0].game.id, waiting.game.id);

    let players = h.orchestrator.list_players().await.expect("List failed");
    assert_eq!(players.players.len(), 2);
    let registered = h.orchestrator.register_player("Cid").await.expect("Register failed");
    let cid = h
        .orchestrator
        .get_player(registered.player_id)
        .await
        .expect("Get failed");
    assert_eq!(cid.player.username(), "Cid");
}

#[tokio::test]
async fn test_late_ranking_replies_count_each_game_once() {
    let store = GameStore::new();
    let registry = PlayerRegistry::in_memory();
    let ranking = LateReplyRanking {
        inner: LocalRankingService::new(registry.clone()),
        delay: Duration::from_millis(200),
    };
    let orchestrator = Orchestrator::new(
        Arc::new(LocalGameService::new(store.clone())),
        Arc::new(ranking),
    )
    .with_timeout(Duration::from_millis(50))
    .with_reconcile_grace(Duration::ZERO);

    let id = started(&orchestrator).await;
    play(&orchestrator, id, &[0, 3, 1, 4, 2]).await;
    assert_eq!(store.pending_results().len(), 2);

    for _ in 0..3 {
        let report = orchestrator.reconcile().await.expect("Reconcile failed");
        assert_eq!(report.recorded, 0);
        assert_eq!(report.failed, 2);
    }

    let ana = stats(&registry, "Ana");
    let bea = stats(&registry, "Bea");
    assert_eq!(*ana.games_played(), 1);
    assert_eq!(*ana.games_won(), 1);
    assert_eq!(*bea.games_played(), 1);
    assert_eq!(*bea.games_lost(), 1);
    assert!(ana.has_recorded(id));
}
