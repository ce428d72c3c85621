//! Game service routes.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::instrument;

use super::error::{json_body, path_param, query_param};
use super::wire::{CreateGameBody, JoinGameBody, ListQuery, MoveBody};
use crate::games::tictactoe::Mark;
use crate::gateway::GameService;
use crate::{GameId, GameSnapshot, GameSummary, PendingResult, ServiceError};

type Games = Arc<dyn GameService>;

/// Routes of the game service.
pub fn game_service_router(games: Games) -> Router {
    Router::new()
        .route("/games", post(create_game).get(list_games))
        .route("/games/{id}", get(get_game))
        .route("/games/{id}/join", post(join_game))
        .route("/games/{id}/move", post(make_move))
        .route("/games/{id}/results/{mark}/ack", post(acknowledge_result))
        .route("/results/pending", get(pending_results))
        .with_state(games)
}

#[instrument(skip_all)]
async fn create_game(
    State(games): State<Games>,
    body: Result<Json<CreateGameBody>, JsonRejection>,
) -> Result<(StatusCode, Json<GameSnapshot>), ServiceError> {
    let body = json_body(body)?;
    let game = games.create(body.seat()).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

#[instrument(skip_all)]
async fn list_games(
    State(games): State<Games>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<GameSummary>>, ServiceError> {
    let list = match query_param(query)?.status.as_deref() {
        None => games.list_all().await?,
        Some("waiting") => games.list_waiting().await?,
        Some(other) => {
            return Err(ServiceError::invalid_input(format!(
                "Unknown status filter '{}'",
                other
            )));
        }
    };
    Ok(Json(list))
}

#[instrument(skip_all)]
async fn get_game(
    State(games): State<Games>,
    id: Result<Path<GameId>, PathRejection>,
) -> Result<Json<GameSnapshot>, ServiceError> {
    Ok(Json(games.get(path_param(id)?).await?))
}

#[instrument(skip_all)]
async fn join_game(
    State(games): State<Games>,
    id: Result<Path<GameId>, PathRejection>,
    body: Result<Json<JoinGameBody>, JsonRejection>,
) -> Result<Json<GameSnapshot>, ServiceError> {
    let id = path_param(id)?;
    let body = json_body(body)?;
    Ok(Json(games.join(id, body.seat()).await?))
}

#[instrument(skip_all)]
async fn make_move(
    State(games): State<Games>,
    id: Result<Path<GameId>, PathRejection>,
    body: Result<Json<MoveBody>, JsonRejection>,
) -> Result<Json<GameSnapshot>, ServiceError> {
    let id = path_param(id)?;
    let MoveBody { mark, position } = json_body(body)?;
    Ok(Json(games.make_move(id, mark, position).await?))
}

#[instrument(skip_all)]
async fn pending_results(
    State(games): State<Games>,
) -> Result<Json<Vec<PendingResult>>, ServiceError> {
    Ok(Json(games.pending_results().await?))
}

#[instrument(skip_all)]
async fn acknowledge_result(
    State(games): State<Games>,
    params: Result<Path<(GameId, Mark)>, PathRejection>,
) -> Result<StatusCode, ServiceError> {
    let (id, mark) = path_param(params)?;
    games.acknowledge_result(id, mark).await?;
    Ok(StatusCode::NO_CONTENT)
}
