//! Tic-tac-toe game-state and player-ranking services behind a gateway.
//!
//! # Architecture
//!
//! - **Board engine** ([`rules`]): pure move legality plus win and draw detection
//! - **Game store** ([`GameStore`]): games keyed by id, one lock per game
//! - **Player registry** ([`PlayerRegistry`]): identities and win/loss/draw counters
//! - **Orchestrator** ([`Orchestrator`]): client use cases and the post-game
//!   result-recording saga, with hypermedia links on every response
//! - **HTTP** ([`game_service_router`], [`player_service_router`], [`gateway_router`])
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tictactoe_gateway::{
//!     GameStore, LocalGameService, LocalRankingService, Mark, Orchestrator, PlayerRegistry,
//! };
//!
//! # async fn example() -> Result<(), tictactoe_gateway::ServiceError> {
//! let orchestrator = Orchestrator::new(
//!     Arc::new(LocalGameService::new(GameStore::new())),
//!     Arc::new(LocalRankingService::new(PlayerRegistry::in_memory())),
//! );
//! let game = orchestrator.create_game("Ana").await?;
//! orchestrator.join_game(game.game.id, "Bea").await?;
//! orchestrator.make_move(game.game.id, Mark::X, 4).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod error;
mod games;
mod gateway;
mod http;
mod ids;
mod registry;
mod store;

// Crate-level exports - Errors and identifiers
pub use error::{ErrorKind, ServiceError};
pub use ids::{GameId, PlayerId};

// Crate-level exports - Board engine
pub use games::tictactoe::{
    Board, BoardParseError, Mark, MoveError, Position, Square, Winner, rules,
};

// Crate-level exports - Game store
pub use store::{
    Game, GameSnapshot, GameStatus, GameStore, GameStoreError, GameSummary, PendingResult, Seat,
};

// Crate-level exports - Player registry
pub use registry::{
    JsonFileStorage, MatchResult, MemoryStorage, Player, PlayerRegistry, PlayerStats,
    PlayerStorage, RegistryError, StorageError,
};

// Crate-level exports - Gateway
pub use gateway::{
    ApiRoot, DEFAULT_RECONCILE_GRACE, DEFAULT_UPSTREAM_TIMEOUT, GameCollection, GameListEntry,
    GameResource, GameService, HttpGameService, HttpRankingService, Link, Links,
    LocalGameService, LocalRankingService, Orchestrator, PlayerCollection, PlayerResource,
    RankingResource, RankingService, ReconcileReport, RegisteredPlayer, Resource,
    SAGA_UPSTREAM_CALLS, links_for, spawn_reconciler,
};

// Crate-level exports - HTTP
pub use http::{
    game_service_router, gateway_router, player_service_router, status_for, with_request_logging,
};

// Crate-level exports - Configuration
pub use config::{ConfigError, GatewayConfig};
