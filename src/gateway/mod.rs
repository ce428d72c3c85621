//! Gateway: the client-facing composition of the game and player services.

mod links;
mod orchestrator;
mod reconciler;
mod remote;
mod resources;
mod services;

pub use links::{Link, Links, Resource, links_for};
pub use orchestrator::{
    DEFAULT_RECONCILE_GRACE, DEFAULT_UPSTREAM_TIMEOUT, Orchestrator, ReconcileReport,
    SAGA_UPSTREAM_CALLS,
};
pub use reconciler::spawn_reconciler;
pub use remote::{HttpGameService, HttpRankingService};
pub use resources::{
    ApiRoot, GameCollection, GameListEntry, GameResource, PlayerCollection, PlayerResource,
    RankingResource, RegisteredPlayer,
};
pub use services::{GameService, LocalGameService, LocalRankingService, RankingService};
