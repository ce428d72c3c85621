//! Request and response bodies shared by the routers and the HTTP clients.

use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::games::tictactoe::Mark;
use crate::{GameId, MatchResult, PlayerId, Seat};

/// `POST /games` on the game service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGameBody {
    /// Name of the player taking X.
    pub player_x: String,
    /// Registry id of that player, if already resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_x_id: Option<PlayerId>,
}

impl CreateGameBody {
    /// Seat described by this body.
    pub fn seat(self) -> Seat {
        Seat::new(self.player_x, self.player_x_id)
    }
}

impl From<&Seat> for CreateGameBody {
    fn from(seat: &Seat) -> Self {
        Self {
            player_x: seat.name().clone(),
            player_x_id: *seat.player_id(),
        }
    }
}

/// `POST /games/{id}/join` on the game service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinGameBody {
    /// Name of the player taking O.
    pub player_o: String,
    /// Registry id of that player, if already resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_o_id: Option<PlayerId>,
}

impl JoinGameBody {
    /// Seat described by this body.
    pub fn seat(self) -> Seat {
        Seat::new(self.player_o, self.player_o_id)
    }
}

impl From<&Seat> for JoinGameBody {
    fn from(seat: &Seat) -> Self {
        Self {
            player_o: seat.name().clone(),
            player_o_id: *seat.player_id(),
        }
    }
}

/// `POST /games/{id}/move` on the game service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct MoveBody {
    /// Mark being played.
    pub mark: Mark,
    /// Board index 0-8.
    pub position: usize,
}

/// `POST /players` on the player service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct RegisterBody {
    /// Requested username.
    pub username: String,
}

/// Response to `POST /players`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredBody {
    /// Id assigned (or already held) by the username.
    pub player_id: PlayerId,
}

/// `POST /players/{id}/results` on the player service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct RecordResultBody {
    /// Outcome from this player's perspective.
    pub result: MatchResult,
    /// The other side of the game, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent_id: Option<PlayerId>,
    /// Game the result belongs to. Repeats for the same game count once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<GameId>,
}

/// Query string of `GET /players/lookup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupQuery {
    /// Username to look up.
    pub username: String,
}

/// Query string of the game list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// `waiting` restricts the list to games waiting for an opponent.
    pub status: Option<String>,
}

/// `POST /api/games` and `POST /api/games/{id}/join` on the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerNameBody {
    /// Name of the player creating or joining.
    #[serde(default)]
    pub player_name: Option<String>,
}

/// `POST /api/games/{id}/move` on the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayMoveBody {
    /// `X` or `O`.
    #[serde(default, alias = "player_symbol")]
    pub symbol: Option<String>,
    /// Board index 0-8.
    #[serde(default)]
    pub position: Option<i64>,
}

/// `POST /api/players` on the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsernameBody {
    /// Requested username.
    #[serde(default)]
    pub username: Option<String>,
}
