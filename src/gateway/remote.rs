//! HTTP clients for the game and player services.
//!
//! Error bodies from the services decode back into [`ServiceError`] so the
//! kind survives the hop. Anything else that goes wrong on the wire
//! (connection refused, timeout, undecodable body) becomes
//! [`ErrorKind::UpstreamUnavailable`](crate::ErrorKind::UpstreamUnavailable).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use super::services::{GameService, RankingService};
use crate::games::tictactoe::Mark;
use crate::http::wire::{
    CreateGameBody, JoinGameBody, MoveBody, RecordResultBody, RegisterBody, RegisteredBody,
};
use crate::{
    GameId, GameSnapshot, GameSummary, MatchResult, PendingResult, Player, PlayerId, Seat,
    ServiceError,
};

#[derive(Debug, Clone)]
struct Upstream {
    name: &'static str,
    base_url: String,
    client: reqwest::Client,
}

impl Upstream {
    fn new(name: &'static str, base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            name,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn unreachable(&self, err: reqwest::Error) -> ServiceError {
        warn!(service = self.name, error = %err, "Upstream call failed");
        ServiceError::upstream(format!("{} service unavailable: {}", self.name, err))
    }

    #[instrument(skip(self), fields(service = self.name))]
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        self.decode(response).await
    }

    #[instrument(skip(self, url), fields(service = self.name))]
    async fn get_url<T: DeserializeOwned>(&self, url: reqwest::Url) -> Result<T, ServiceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        self.decode(response).await
    }

    #[instrument(skip(self, body), fields(service = self.name))]
    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        self.decode(response).await
    }

    #[instrument(skip(self), fields(service = self.name))]
    async fn post_empty(&self, path: &str) -> Result<(), ServiceError> {
        let response = self
            .client
            .post(self.url(path))
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(self.failure(response).await)
    }

    async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T, ServiceError> {
        if !response.status().is_success() {
            return Err(self.failure(response).await);
        }
        response.json::<T>().await.map_err(|e| {
            warn!(service = self.name, error = %e, "Undecodable upstream response");
            ServiceError::upstream(format!("{} service sent an undecodable response: {}", self.name, e))
        })
    }

    async fn failure(&self, response: reqwest::Response) -> ServiceError {
        let status = response.status();
        match response.json::<ServiceError>().await {
            Ok(err) => {
                debug!(service = self.name, %status, kind = %err.kind(), "Upstream rejected request");
                err
            }
            Err(_) => {
                warn!(service = self.name, %status, "Upstream failed without an error body");
                ServiceError::upstream(format!("{} service returned {}", self.name, status))
            }
        }
    }
}

/// [`GameService`] reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGameService {
    upstream: Upstream,
}

impl HttpGameService {
    /// Client for the game service at `base_url`, with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            upstream: Upstream::new("game", base_url, timeout)?,
        })
    }
}

#[async_trait]
impl GameService for HttpGameService {
    async fn create(&self, player_x: Seat) -> Result<GameSnapshot, ServiceError> {
        self.upstream
            .post("/games", &CreateGameBody::from(&player_x))
            .await
    }

    async fn join(&self, game_id: GameId, player_o: Seat) -> Result<GameSnapshot, ServiceError> {
        self.upstream
            .post(&format!("/games/{}/join", game_id), &JoinGameBody::from(&player_o))
            .await
    }

    async fn make_move(
        &self,
        game_id: GameId,
        mark: Mark,
        position: usize,
    ) -> Result<GameSnapshot, ServiceError> {
        self.upstream
            .post(&format!("/games/{}/move", game_id), &MoveBody::new(mark, position))
            .await
    }

    async fn get(&self, game_id: GameId) -> Result<GameSnapshot, ServiceError> {
        self.upstream.get(&format!("/games/{}", game_id)).await
    }

    async fn list_waiting(&self) -> Result<Vec<GameSummary>, ServiceError> {
        self.upstream.get("/games?status=waiting").await
    }

    async fn list_all(&self) -> Result<Vec<GameSummary>, ServiceError> {
        self.upstream.get("/games").await
    }

    async fn pending_results(&self) -> Result<Vec<PendingResult>, ServiceError> {
        self.upstream.get("/results/pending").await
    }

    async fn acknowledge_result(&self, game_id: GameId, mark: Mark) -> Result<(), ServiceError> {
        self.upstream
            .post_empty(&format!("/games/{}/results/{}/ack", game_id, mark))
            .await
    }
}

/// [`RankingService`] reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRankingService {
    upstream: Upstream,
}

impl HttpRankingService {
    /// Client for the player service at `base_url`, with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            upstream: Upstream::new("player", base_url, timeout)?,
        })
    }
}

#[async_trait]
impl RankingService for HttpRankingService {
    async fn register(&self, username: &str) -> Result<PlayerId, ServiceError> {
        let registered: RegisteredBody = self
            .upstream
            .post("/players", &RegisterBody::new(username.to_string()))
            .await?;
        Ok(registered.player_id)
    }

    async fn record_result(
        &self,
        player_id: PlayerId,
        result: MatchResult,
        opponent_id: Option<PlayerId>,
        game_id: Option<GameId>,
    ) -> Result<Player, ServiceError> {
        self.upstream
            .post(
                &format!("/players/{}/results", player_id),
                &RecordResultBody::new(result, opponent_id, game_id),
            )
            .await
    }

    async fn get_stats(&self, player_id: PlayerId) -> Result<Player, ServiceError> {
        self.upstream.get(&format!("/players/{}", player_id)).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Player>, ServiceError> {
        let mut url = reqwest::Url::parse(&self.upstream.url("/players/lookup"))
            .map_err(|e| ServiceError::internal(format!("Invalid player service URL: {}", e)))?;
        url.query_pairs_mut().append_pair("username", username);
        self.upstream.get_url(url).await
    }

    async fn list_all(&self) -> Result<Vec<Player>, ServiceError> {
        self.upstream.get("/players").await
    }
}
