//! Player records and match results.

use derive_getters::Getters;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{GameId, PlayerId};

/// Result of one finished game from a single player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum MatchResult {
    /// Player won the game.
    #[serde(rename = "W")]
    Win,
    /// Player lost the game.
    #[serde(rename = "L")]
    Loss,
    /// Game ended in a draw.
    #[serde(rename = "D")]
    Draw,
}

impl MatchResult {
    /// The result the opponent gets for the same game.
    pub fn mirrored(self) -> Self {
        match self {
            Self::Win => Self::Loss,
            Self::Loss => Self::Win,
            Self::Draw => Self::Draw,
        }
    }
}

/// Stored player identity with cumulative results.
///
/// `games_played` always equals `games_won + games_lost + games_drawn`.
/// Results recorded under a game id are remembered in `recorded_games`, so a
/// replay for the same game counts nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Player {
    player_id: PlayerId,
    username: String,
    #[serde(default)]
    games_played: u32,
    #[serde(default)]
    games_won: u32,
    #[serde(default)]
    games_lost: u32,
    #[serde(default)]
    games_drawn: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[getter(skip)]
    recorded_games: Vec<GameId>,
}

/// Read-only projection handed out by the registry.
pub type PlayerStats = Player;

impl Player {
    /// Creates a player with all counters at zero.
    #[instrument]
    pub(crate) fn new(username: String) -> Self {
        Self {
            player_id: PlayerId::generate(),
            username,
            games_played: 0,
            games_won: 0,
            games_lost: 0,
            games_drawn: 0,
            recorded_games: Vec::new(),
        }
    }

    /// Whether a result for `game_id` has already been counted.
    pub fn has_recorded(&self, game_id: GameId) -> bool {
        self.recorded_games.contains(&game_id)
    }

    /// Counts one more finished game.
    pub(crate) fn record(&mut self, result: MatchResult) {
        self.games_played += 1;
        match result {
            MatchResult::Win => self.games_won += 1,
            MatchResult::Loss => self.games_lost += 1,
            MatchResult::Draw => self.games_drawn += 1,
        }
    }

    /// Counts `game_id` once. Returns false, leaving counters alone, on a replay.
    pub(crate) fn record_game(&mut self, game_id: GameId, result: MatchResult) -> bool {
        if self.has_recorded(game_id) {
            return false;
        }
        self.recorded_games.push(game_id);
        self.record(result);
        true
    }

    /// Whether the played counter matches the per-result counters.
    pub fn is_consistent(&self) -> bool {
        self.games_played == self.games_won + self.games_lost + self.games_drawn
    }

    /// Calculates win rate as a percentage (0.0-100.0).
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            (self.games_won as f64 / self.games_played as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_counters_consistent() {
        let mut player = Player::new("Ana".to_string());
        player.record(MatchResult::Win);
        player.record(MatchResult::Draw);
        player.record(MatchResult::Loss);
        player.record(MatchResult::Win);
        assert_eq!(*player.games_played(), 4);
        assert_eq!(*player.games_won(), 2);
        assert!(player.is_consistent());
        assert!((player.win_rate() - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_record_game_counts_each_game_once() {
        let mut player = Player::new("Ana".to_string());
        let game = GameId::generate();
        assert!(player.record_game(game, MatchResult::Win));
        assert!(!player.record_game(game, MatchResult::Win));
        assert!(player.record_game(GameId::generate(), MatchResult::Loss));
        assert_eq!(*player.games_played(), 2);
        assert_eq!(*player.games_won(), 1);
        assert!(player.has_recorded(game));
    }

    #[test]
    fn test_missing_counters_default_to_zero() {
        let id = PlayerId::generate();
        let json = format!(r#"{{"player_id":"{id}","username":"Bea"}}"#);
        let player: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(*player.games_played(), 0);
        assert_eq!(player.win_rate(), 0.0);
    }

    #[test]
    fn test_result_codes() {
        assert_eq!(serde_json::to_string(&MatchResult::Loss).unwrap(), "\"L\"");
        assert_eq!(MatchResult::Win.mirrored(), MatchResult::Loss);
        assert_eq!(MatchResult::Draw.mirrored(), MatchResult::Draw);
    }
}
