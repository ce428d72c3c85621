//! Player service routes.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::instrument;

use super::error::{json_body, path_param, query_param};
use super::wire::{LookupQuery, RecordResultBody, RegisterBody, RegisteredBody};
use crate::gateway::RankingService;
use crate::{Player, PlayerId, ServiceError};

type Players = Arc<dyn RankingService>;

/// Routes of the player service.
pub fn player_service_router(players: Players) -> Router {
    Router::new()
        .route("/players", post(register).get(list_players))
        .route("/players/lookup", get(lookup))
        .route("/players/{id}", get(get_player))
        .route("/players/{id}/results", post(record_result))
        .with_state(players)
}

#[instrument(skip_all)]
async fn register(
    State(players): State<Players>,
    body: Result<Json<RegisterBody>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisteredBody>), ServiceError> {
    let RegisterBody { username } = json_body(body)?;
    let player_id = players.register(&username).await?;
    Ok((StatusCode::CREATED, Json(RegisteredBody { player_id })))
}

#[instrument(skip_all)]
async fn list_players(State(players): State<Players>) -> Result<Json<Vec<Player>>, ServiceError> {
    Ok(Json(players.list_all().await?))
}

#[instrument(skip_all)]
async fn lookup(
    State(players): State<Players>,
    query: Result<Query<LookupQuery>, QueryRejection>,
) -> Result<Json<Option<Player>>, ServiceError> {
    let LookupQuery { username } = query_param(query)?;
    Ok(Json(players.find_by_username(&username).await?))
}

#[instrument(skip_all)]
async fn get_player(
    State(players): State<Players>,
    id: Result<Path<PlayerId>, PathRejection>,
) -> Result<Json<Player>, ServiceError> {
    Ok(Json(players.get_stats(path_param(id)?).await?))
}

#[instrument(skip_all)]
async fn record_result(
    State(players): State<Players>,
    id: Result<Path<PlayerId>, PathRejection>,
    body: Result<Json<RecordResultBody>, JsonRejection>,
) -> Result<Json<Player>, ServiceError> {
    let id = path_param(id)?;
    let RecordResultBody {
        result,
        opponent_id,
        game_id,
    } = json_body(body)?;
    Ok(Json(
        players
            .record_result(id, result, opponent_id, game_id)
            .await?,
    ))
}
