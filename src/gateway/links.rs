//! Hypermedia links attached to gateway responses.
//!
//! Every resource carries a `_links` map of relation name to
//! `{ "href": ..., "method": ... }` telling the client what it can do next.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{GameId, PlayerId};

/// A single navigable action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target path.
    pub href: String,
    /// HTTP method to use.
    pub method: String,
}

impl Link {
    fn get(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            method: "GET".to_string(),
        }
    }

    fn post(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            method: "POST".to_string(),
        }
    }
}

/// Relation name to link, serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Links(BTreeMap<String, Link>);

impl Links {
    /// Looks up a relation.
    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.0.get(rel)
    }

    /// Relation names present.
    pub fn rels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Adds `rel` pointing at the `self` link of `resource`.
    pub fn relate(mut self, rel: &str, resource: Resource<'_>) -> Self {
        if let Some(link) = links_for(resource).0.remove("self") {
            self.0.insert(rel.to_string(), link);
        }
        self
    }

    fn with(mut self, rel: &str, link: Link) -> Self {
        self.0.insert(rel.to_string(), link);
        self
    }
}

/// Anything the gateway can link to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource<'a> {
    /// API entry point.
    Root,
    /// The game collection.
    Games,
    /// One game.
    Game(GameId),
    /// The player collection.
    Players,
    /// One player.
    Player(PlayerId),
    /// A ranking lookup by name.
    Ranking(&'a str),
}

/// Standard links for a resource.
pub fn links_for(resource: Resource<'_>) -> Links {
    let links = Links::default();
    match resource {
        Resource::Root => links
            .with("self", Link::get("/api"))
            .with("games", Link::get("/api/games"))
            .with("create_game", Link::post("/api/games"))
            .with("waiting_games", Link::get("/api/games?status=waiting"))
            .with("players", Link::get("/api/players"))
            .with("register_player", Link::post("/api/players"))
            .with("ranking", Link::get("/api/ranking/{name}")),
        Resource::Games => links
            .with("self", Link::get("/api/games"))
            .with("create", Link::post("/api/games"))
            .with("waiting", Link::get("/api/games?status=waiting")),
        Resource::Game(id) => links
            .with("self", Link::get(format!("/api/games/{}", id)))
            .with("join", Link::post(format!("/api/games/{}/join", id)))
            .with("move", Link::post(format!("/api/games/{}/move", id)))
            .with("games", Link::get("/api/games")),
        Resource::Players => links
            .with("self", Link::get("/api/players"))
            .with("register", Link::post("/api/players")),
        Resource::Player(id) => links
            .with("self", Link::get(format!("/api/players/{}", id)))
            .with("players", Link::get("/api/players"))
            .with("games", Link::get("/api/games")),
        Resource::Ranking(name) => links
            .with("self", Link::get(ranking_href(name)))
            .with("players", Link::get("/api/players")),
    }
}

/// `/api/ranking/{name}` with `name` escaped as a single path segment.
fn ranking_href(name: &str) -> String {
    let Ok(mut url) = reqwest::Url::parse("http://gateway/api/ranking") else {
        return format!("/api/ranking/{}", name);
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(name);
    }
    url.path().to_string()
}
