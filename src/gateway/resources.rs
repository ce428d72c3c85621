//! Gateway response bodies: domain data plus `_links`.

use serde::{Deserialize, Serialize};

use super::links::{Links, Resource, links_for};
use crate::{GameSnapshot, GameStatus, GameSummary, Player, PlayerId};

/// A game with its next actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResource {
    /// Game state.
    #[serde(flatten)]
    pub game: GameSnapshot,
    /// Next actions.
    #[serde(rename = "_links")]
    pub links: Links,
}

impl GameResource {
    /// Wraps a snapshot, linking to each seated player whose id is known.
    pub fn new(game: GameSnapshot) -> Self {
        let mut links = links_for(Resource::Game(game.id));
        if let Some(id) = game.player_x_id {
            links = links.relate("player_x", Resource::Player(id));
        }
        if let Some(id) = game.player_o_id {
            links = links.relate("player_o", Resource::Player(id));
        }
        Self { game, links }
    }

    /// Adds a relation.
    pub fn relate(mut self, rel: &str, resource: Resource<'_>) -> Self {
        self.links = self.links.relate(rel, resource);
        self
    }

    /// Whether the game has finished.
    pub fn is_completed(&self) -> bool {
        self.game.status == GameStatus::Completed
    }
}

/// One row of a game listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameListEntry {
    /// Game summary.
    #[serde(flatten)]
    pub game: GameSummary,
    /// Next actions.
    #[serde(rename = "_links")]
    pub links: Links,
}

impl From<GameSummary> for GameListEntry {
    fn from(game: GameSummary) -> Self {
        let links = links_for(Resource::Game(game.id));
        Self { game, links }
    }
}

/// A game listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCollection {
    /// Listed games, oldest first.
    pub games: Vec<GameListEntry>,
    /// Next actions.
    #[serde(rename = "_links")]
    pub links: Links,
}

impl FromIterator<GameSummary> for GameCollection {
    fn from_iter<I: IntoIterator<Item = GameSummary>>(iter: I) -> Self {
        Self {
            games: iter.into_iter().map(GameListEntry::from).collect(),
            links: links_for(Resource::Games),
        }
    }
}

/// A player's statistics with navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResource {
    /// Player record.
    #[serde(flatten)]
    pub player: Player,
    /// Next actions.
    #[serde(rename = "_links")]
    pub links: Links,
}

impl From<Player> for PlayerResource {
    fn from(player: Player) -> Self {
        let links = links_for(Resource::Player(*player.player_id()));
        Self { player, links }
    }
}

/// The player listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCollection {
    /// Every registered player.
    pub players: Vec<PlayerResource>,
    /// Next actions.
    #[serde(rename = "_links")]
    pub links: Links,
}

impl FromIterator<Player> for PlayerCollection {
    fn from_iter<I: IntoIterator<Item = Player>>(iter: I) -> Self {
        Self {
            players: iter.into_iter().map(PlayerResource::from).collect(),
            links: links_for(Resource::Players),
        }
    }
}

/// Response to a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredPlayer {
    /// Assigned id.
    pub player_id: PlayerId,
    /// Registered name.
    pub username: String,
    /// Next actions.
    #[serde(rename = "_links")]
    pub links: Links,
}

impl RegisteredPlayer {
    /// Registration response for `username`.
    pub fn new(player_id: PlayerId, username: impl Into<String>) -> Self {
        Self {
            player_id,
            username: username.into(),
            links: links_for(Resource::Player(player_id)).relate("create_game", Resource::Games),
        }
    }
}

/// Win count for a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingResource {
    /// Queried name.
    pub name: String,
    /// Games won, 0 when the name is unknown.
    pub ranking: u32,
    /// Next actions.
    #[serde(rename = "_links")]
    pub links: Links,
}

impl RankingResource {
    /// Ranking response, linking to the player when registered.
    pub fn new(name: &str, player: Option<&Player>) -> Self {
        let mut links = links_for(Resource::Ranking(name));
        if let Some(player) = player {
            links = links.relate("player", Resource::Player(*player.player_id()));
        }
        Self {
            name: name.to_string(),
            ranking: player.map(|p| *p.games_won()).unwrap_or(0),
            links,
        }
    }
}

/// Entry point of the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRoot {
    /// Service name.
    pub name: String,
    /// Crate version.
    pub version: String,
    /// Next actions.
    #[serde(rename = "_links")]
    pub links: Links,
}

impl Default for ApiRoot {
    fn default() -> Self {
        Self {
            name: "tic-tac-toe gateway".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            links: links_for(Resource::Root),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameStore, Seat};

    #[test]
    fn test_game_resource_flattens_snapshot() {
        let store = GameStore::new();
        let player = PlayerId::generate();
        let game = store.create(Seat::registered("Ana", player)).unwrap();
        let json = serde_json::to_value(GameResource::new(game.clone())).unwrap();

        assert_eq!(json["id"], game.id.to_string());
        assert_eq!(json["board"], "---------");
        assert_eq!(json["status"], "WAITING_OPPONENT");
        assert_eq!(json["_links"]["player_x"]["href"], format!("/api/players/{}", player));
        assert!(json["_links"].get("player_o").is_none());
    }

    #[test]
    fn test_unknown_ranking_is_zero() {
        let ranking = RankingResource::new("Nobody", None);
        assert_eq!(ranking.ranking, 0);
        assert!(ranking.links.get("player").is_none());
    }
}
