//! Client-facing gateway routes.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::instrument;

use super::error::{json_body, path_param, query_param};
use super::wire::{GatewayMoveBody, ListQuery, PlayerNameBody, UsernameBody};
use crate::games::tictactoe::Mark;
use crate::gateway::{
    ApiRoot, GameCollection, GameResource, Orchestrator, PlayerCollection, PlayerResource,
    RankingResource, RegisteredPlayer,
};
use crate::{ErrorKind, GameId, PlayerId, ServiceError};

/// Routes of the gateway.
pub fn gateway_router(orchestrator: Orchestrator) -> Router {
    Router::new()
        .route("/api", get(api_root))
        .route("/api/games", post(create_game).get(list_games))
        .route("/api/games/{id}", get(get_game))
        .route("/api/games/{id}/join", post(join_game))
        .route("/api/games/{id}/move", post(make_move))
        .route("/api/players", post(register_player).get(list_players))
        .route("/api/players/{id}", get(get_player))
        .route("/api/ranking/{name}", get(query_ranking))
        .with_state(orchestrator)
}

fn required(field: Option<String>, name: &str) -> Result<String, ServiceError> {
    field
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ServiceError::invalid_input(format!("{} is required", name)))
}

fn parse_symbol(symbol: &str) -> Result<Mark, ServiceError> {
    match symbol.trim() {
        "X" | "x" => Ok(Mark::X),
        "O" | "o" => Ok(Mark::O),
        other => Err(ServiceError::invalid_input(format!(
            "Symbol must be X or O, got '{}'",
            other
        ))),
    }
}

fn parse_position(position: i64) -> Result<usize, ServiceError> {
    usize::try_from(position).map_err(|_| {
        ServiceError::new(
            ErrorKind::IllegalMove,
            format!("Position {} is out of bounds (must be 0-8)", position),
        )
    })
}

#[instrument(skip_all)]
async fn api_root(State(orchestrator): State<Orchestrator>) -> Json<ApiRoot> {
    Json(orchestrator.api_root())
}

#[instrument(skip_all)]
async fn create_game(
    State(orchestrator): State<Orchestrator>,
    body: Result<Json<PlayerNameBody>, JsonRejection>,
) -> Result<(StatusCode, Json<GameResource>), ServiceError> {
    let name = required(json_body(body)?.player_name, "player_name")?;
    let game = orchestrator.create_game(&name).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

#[instrument(skip_all)]
async fn list_games(
    State(orchestrator): State<Orchestrator>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<GameCollection>, ServiceError> {
    let waiting_only = match query_param(query)?.status.as_deref() {
        None => false,
        Some("waiting") => true,
        Some(other) => {
            return Err(ServiceError::invalid_input(format!(
                "Unknown status filter '{}'",
                other
            )));
        }
    };
    Ok(Json(orchestrator.list_games(waiting_only).await?))
}

#[instrument(skip_all)]
async fn get_game(
    State(orchestrator): State<Orchestrator>,
    id: Result<Path<GameId>, PathRejection>,
) -> Result<Json<GameResource>, ServiceError> {
    Ok(Json(orchestrator.get_game(path_param(id)?).await?))
}

#[instrument(skip_all)]
async fn join_game(
    State(orchestrator): State<Orchestrator>,
    id: Result<Path<GameId>, PathRejection>,
    body: Result<Json<PlayerNameBody>, JsonRejection>,
) -> Result<Json<GameResource>, ServiceError> {
    let id = path_param(id)?;
    let name = required(json_body(body)?.player_name, "player_name")?;
    Ok(Json(orchestrator.join_game(id, &name).await?))
}

#[instrument(skip_all)]
async fn make_move(
    State(orchestrator): State<Orchestrator>,
    id: Result<Path<GameId>, PathRejection>,
    body: Result<Json<GatewayMoveBody>, JsonRejection>,
) -> Result<Json<GameResource>, ServiceError> {
    let id = path_param(id)?;
    let body = json_body(body)?;
    let mark = parse_symbol(&required(body.symbol, "symbol")?)?;
    let position = body
        .position
        .ok_or_else(|| ServiceError::invalid_input("position is required"))
        .and_then(parse_position)?;
    Ok(Json(orchestrator.make_move(id, mark, position).await?))
}

#[instrument(skip_all)]
async fn register_player(
    State(orchestrator): State<Orchestrator>,
    body: Result<Json<UsernameBody>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisteredPlayer>), ServiceError> {
    let username = required(json_body(body)?.username, "username")?;
    let registered = orchestrator.register_player(&username).await?;
    Ok((StatusCode::CREATED, Json(registered)))
}

#[instrument(skip_all)]
async fn list_players(
    State(orchestrator): State<Orchestrator>,
) -> Result<Json<PlayerCollection>, ServiceError> {
    Ok(Json(orchestrator.list_players().await?))
}

#[instrument(skip_all)]
async fn get_player(
    State(orchestrator): State<Orchestrator>,
    id: Result<Path<PlayerId>, PathRejection>,
) -> Result<Json<PlayerResource>, ServiceError> {
    Ok(Json(orchestrator.get_player(path_param(id)?).await?))
}

#[instrument(skip_all)]
async fn query_ranking(
    State(orchestrator): State<Orchestrator>,
    name: Result<Path<String>, PathRejection>,
) -> Result<Json<RankingResource>, ServiceError> {
    Ok(Json(orchestrator.query_ranking(&path_param(name)?).await?))
}
