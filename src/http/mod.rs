//! HTTP surfaces: the game service, the player service and the gateway.

mod error;
mod games;
mod gateway;
mod players;
pub(crate) mod wire;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use tower::ServiceBuilder;
use tracing::debug;

pub use error::status_for;
pub use games::game_service_router;
pub use gateway::gateway_router;
pub use players::player_service_router;

/// Adds request logging to a router.
pub fn with_request_logging(router: Router) -> Router {
    router.layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
        debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
        req
    }))
}
