//! tictactoe_gateway - unified CLI
//!
//! Runs the game service, the player service, the gateway, or all three in one
//! process.

#![warn(missing_docs)]

mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use clap::Parser;
use cli::{Cli, Command};
use tictactoe_gateway::{
    GameService, GameStore, GatewayConfig, HttpGameService, HttpRankingService, JsonFileStorage,
    LocalGameService, LocalRankingService, Orchestrator, PlayerRegistry, RankingService,
    game_service_router, gateway_router, player_service_router, spawn_reconciler,
    with_request_logging,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tictactoe_gateway=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Games { port, host } => run_games(host, port).await,
        Command::Players {
            port,
            host,
            data_file,
        } => run_players(host, port, data_file).await,
        Command::Gateway { port, host, config } => run_gateway(host, port, config).await,
        Command::Standalone { port, host, config } => run_standalone(host, port, config).await,
    }
}

/// Run the game-state service
#[instrument]
async fn run_games(host: String, port: u16) -> Result<()> {
    info!("Starting game service");
    let games: Arc<dyn GameService> = Arc::new(LocalGameService::new(GameStore::new()));
    serve(&host, port, game_service_router(games)).await
}

/// Run the player-ranking service
#[instrument(fields(data_file = %data_file.display()))]
async fn run_players(host: String, port: u16, data_file: PathBuf) -> Result<()> {
    info!("Starting player service");
    let registry = PlayerRegistry::new(JsonFileStorage::new(data_file));
    let players: Arc<dyn RankingService> = Arc::new(LocalRankingService::new(registry));
    serve(&host, port, player_service_router(players)).await
}

/// Run the gateway against remote services
#[instrument(fields(config = %config.display()))]
async fn run_gateway(host: String, port: u16, config: PathBuf) -> Result<()> {
    let config = GatewayConfig::load_or_default(&config)?;
    info!(games_url = %config.games_url(), players_url = %config.players_url(), "Starting gateway");

    let games = HttpGameService::new(config.games_url(), config.upstream_timeout())?;
    let players = HttpRankingService::new(config.players_url(), config.upstream_timeout())?;
    let orchestrator = Orchestrator::new(Arc::new(games), Arc::new(players))
        .with_timeout(config.upstream_timeout())
        .with_reconcile_grace(config.reconcile_grace());

    let reconciler = spawn_reconciler(orchestrator.clone(), config.reconcile_interval());
    let result = serve(&host, port, gateway_router(orchestrator)).await;
    reconciler.abort();
    result
}

/// Run the gateway with both services in-process
#[instrument(fields(config = %config.display()))]
async fn run_standalone(host: String, port: u16, config: PathBuf) -> Result<()> {
    let config = GatewayConfig::load_or_default(&config)?;
    info!(players_file = %config.players_file().display(), "Starting standalone gateway");

    let games: Arc<dyn GameService> = Arc::new(LocalGameService::new(GameStore::new()));
    let registry = PlayerRegistry::new(JsonFileStorage::new(config.players_file().clone()));
    let players: Arc<dyn RankingService> = Arc::new(LocalRankingService::new(registry));
    let orchestrator = Orchestrator::new(games.clone(), players.clone())
        .with_timeout(config.upstream_timeout())
        .with_reconcile_grace(config.reconcile_grace());

    let reconciler = spawn_reconciler(orchestrator.clone(), config.reconcile_interval());
    let app = gateway_router(orchestrator)
        .nest("/internal", game_service_router(games).merge(player_service_router(players)));
    let result = serve(&host, port, app).await;
    reconciler.abort();
    result
}

async fn serve(host: &str, port: u16, app: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(address = %listener.local_addr()?, "Listening");
    axum::serve(listener, with_request_logging(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
