//! A single game: board plus seats and lifecycle.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::{GameStoreError, PendingResult};
use crate::games::tictactoe::{Board, Mark, Winner, rules};
use crate::{GameId, PlayerId};

/// Lifecycle status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    /// Created, O seat still empty.
    #[display("waiting for an opponent")]
    WaitingOpponent,
    /// Both seats taken, moves accepted.
    #[display("in progress")]
    InProgress,
    /// Won or drawn. Terminal.
    #[display("completed")]
    Completed,
}

/// One side of a game: the display name and, once resolved, the player id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Seat {
    name: String,
    #[serde(default)]
    player_id: Option<PlayerId>,
}

impl Seat {
    /// A seat with an optional player id.
    pub fn new(name: impl Into<String>, player_id: Option<PlayerId>) -> Self {
        Self {
            name: name.into(),
            player_id,
        }
    }

    /// A seat known only by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            player_id: None,
        }
    }

    /// A seat whose player id has been resolved.
    pub fn registered(name: impl Into<String>, player_id: PlayerId) -> Self {
        Self {
            name: name.into(),
            player_id: Some(player_id),
        }
    }
}

/// Point-in-time copy of a game as handed out by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Game id.
    pub id: GameId,
    /// Board in wire form.
    pub board: Board,
    /// Mark to move next (unchanged once completed).
    pub current_turn: Mark,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Verdict, set once completed.
    pub winner: Option<Winner>,
    /// X seat display name.
    pub player_x: String,
    /// O seat display name.
    pub player_o: Option<String>,
    /// X seat player id, when resolved.
    pub player_x_id: Option<PlayerId>,
    /// O seat player id, when resolved.
    pub player_o_id: Option<PlayerId>,
    /// Positions played, in order.
    pub moves: Vec<usize>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
    /// Completion time.
    pub completed_at: Option<DateTime<Utc>>,
}

impl GameSnapshot {
    /// The seat holding `mark`, if filled.
    pub fn seat(&self, mark: Mark) -> Option<Seat> {
        match mark {
            Mark::X => Some(Seat {
                name: self.player_x.clone(),
                player_id: self.player_x_id,
            }),
            Mark::O => self.player_o.as_ref().map(|name| Seat {
                name: name.clone(),
                player_id: self.player_o_id,
            }),
        }
    }
}

/// Listing entry for a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Game id.
    pub id: GameId,
    /// X seat display name.
    pub player_x: String,
    /// O seat display name.
    pub player_o: Option<String>,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Mark to move next.
    pub current_turn: Mark,
    /// Verdict, set once completed.
    pub winner: Option<Winner>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Mutable game record, owned by the store.
#[derive(Debug, Clone)]
pub struct Game {
    id: GameId,
    board: Board,
    current_turn: Mark,
    status: GameStatus,
    player_x: Seat,
    player_o: Option<Seat>,
    winner: Option<Winner>,
    history: Vec<usize>,
    // Sides whose result has not yet been acknowledged by the ranking saga.
    unrecorded: Vec<Mark>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Game {
    /// Creates a game waiting for an opponent, X to move.
    #[instrument(skip(player_x), fields(player_x = %player_x.name))]
    pub(super) fn new(player_x: Seat) -> Self {
        let now = Utc::now();
        let game = Self {
            id: GameId::generate(),
            board: Board::new(),
            current_turn: Mark::X,
            status: GameStatus::WaitingOpponent,
            player_x,
            player_o: None,
            winner: None,
            history: Vec::new(),
            unrecorded: Vec::new(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        info!(game_id = %game.id, "Game created");
        game
    }

    /// Game id.
    pub fn id(&self) -> GameId {
        self.id
    }

    /// Lifecycle status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Fills the O seat and starts play.
    #[instrument(skip(self, player_o), fields(game_id = %self.id, player_o = %player_o.name))]
    pub(super) fn join(&mut self, player_o: Seat) -> Result<(), GameStoreError> {
        if self.player_o.is_some() || self.status != GameStatus::WaitingOpponent {
            warn!(status = %self.status, "Join rejected, game full");
            return Err(GameStoreError::GameFull(self.id));
        }
        self.player_o = Some(player_o);
        self.status = GameStatus::InProgress;
        self.updated_at = Utc::now();
        info!("Opponent joined, game in progress");
        Ok(())
    }

    /// Applies `mark` at `index`, then settles win/draw or passes the turn.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub(super) fn play(&mut self, mark: Mark, index: usize) -> Result<(), GameStoreError> {
        match self.status {
            GameStatus::InProgress => {}
            GameStatus::WaitingOpponent => {
                return Err(self.invalid_state("waiting for an opponent to join"));
            }
            GameStatus::Completed => {
                return Err(self.invalid_state("game already finished"));
            }
        }

        if mark != self.current_turn {
            warn!(expected = %self.current_turn, got = %mark, "Move out of turn");
            return Err(GameStoreError::WrongTurn {
                expected: self.current_turn,
                got: mark,
            });
        }

        rules::check(&self.board, index, self.winner).inspect_err(|e| {
            warn!(index, error = %e, "Illegal move");
        })?;
        self.board = rules::apply(self.board.clone(), index, mark)?;
        self.history.push(index);
        self.updated_at = Utc::now();

        match rules::evaluate(&self.board, mark) {
            Some(winner) => {
                self.winner = Some(winner);
                self.status = GameStatus::Completed;
                self.completed_at = Some(self.updated_at);
                self.unrecorded = vec![Mark::X, Mark::O];
                info!(winner = %winner, moves = self.history.len(), "Game completed");
            }
            None => {
                self.current_turn = mark.opponent();
                info!(next = %self.current_turn, "Move accepted");
            }
        }
        Ok(())
    }

    /// Marks `mark`'s result as recorded. Returns whether anything changed.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub(super) fn acknowledge(&mut self, mark: Mark) -> Result<bool, GameStoreError> {
        if self.status != GameStatus::Completed {
            return Err(self.invalid_state("no result to acknowledge"));
        }
        let before = self.unrecorded.len();
        self.unrecorded.retain(|m| *m != mark);
        let changed = self.unrecorded.len() != before;
        if changed {
            info!(mark = %mark, remaining = self.unrecorded.len(), "Result acknowledged");
        }
        Ok(changed)
    }

    /// Results still owed to the player registry.
    pub fn pending_results(&self) -> Vec<PendingResult> {
        if self.unrecorded.is_empty() {
            return Vec::new();
        }
        PendingResult::settle(&self.snapshot())
            .into_iter()
            .filter(|pending| self.unrecorded.contains(&pending.mark))
            .collect()
    }

    /// Copies the current state out.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            id: self.id,
            board: self.board.clone(),
            current_turn: self.current_turn,
            status: self.status,
            winner: self.winner,
            player_x: self.player_x.name.clone(),
            player_o: self.player_o.as_ref().map(|s| s.name.clone()),
            player_x_id: self.player_x.player_id,
            player_o_id: self.player_o.as_ref().and_then(|s| s.player_id),
            moves: self.history.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            completed_at: self.completed_at,
        }
    }

    /// Listing entry.
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            id: self.id,
            player_x: self.player_x.name.clone(),
            player_o: self.player_o.as_ref().map(|s| s.name.clone()),
            status: self.status,
            current_turn: self.current_turn,
            winner: self.winner,
            created_at: self.created_at,
        }
    }

    /// Creation time, used for listing order.
    pub(super) fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn invalid_state(&self, reason: &'static str) -> GameStoreError {
        warn!(status = %self.status, reason, "Operation rejected");
        GameStoreError::InvalidState {
            game_id: self.id,
            status: self.status,
            reason,
        }
    }
}
