//! Results a completed game owes the player registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GameSnapshot, GameStatus, Seat};
use crate::games::tictactoe::{Mark, Winner};
use crate::{GameId, MatchResult};

/// One side's outcome of a completed game, awaiting recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingResult {
    /// Completed game.
    pub game_id: GameId,
    /// Side this entry is for.
    pub mark: Mark,
    /// The side's seat.
    pub player: Seat,
    /// The other side's seat.
    pub opponent: Seat,
    /// Outcome from this side's perspective.
    pub result: MatchResult,
    /// When the game completed.
    pub completed_at: DateTime<Utc>,
}

impl PendingResult {
    /// Both sides' results for a completed game, X first.
    ///
    /// Empty unless the snapshot is completed with both seats filled.
    pub fn settle(snapshot: &GameSnapshot) -> Vec<PendingResult> {
        let (Some(winner), Some(completed_at)) = (snapshot.winner, snapshot.completed_at) else {
            return Vec::new();
        };
        if snapshot.status != GameStatus::Completed {
            return Vec::new();
        }
        let (Some(seat_x), Some(seat_o)) = (snapshot.seat(Mark::X), snapshot.seat(Mark::O)) else {
            return Vec::new();
        };

        let result_x = match winner {
            Winner::X => MatchResult::Win,
            Winner::O => MatchResult::Loss,
            Winner::Draw => MatchResult::Draw,
        };

        vec![
            PendingResult {
                game_id: snapshot.id,
                mark: Mark::X,
                player: seat_x.clone(),
                opponent: seat_o.clone(),
                result: result_x,
                completed_at,
            },
            PendingResult {
                game_id: snapshot.id,
                mark: Mark::O,
                player: seat_o,
                opponent: seat_x,
                result: result_x.mirrored(),
                completed_at,
            },
        ]
    }
}
