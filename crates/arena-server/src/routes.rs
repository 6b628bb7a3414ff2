use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{self, agents, competitions, leaderboard, submissions};
use crate::state::AppState;

/// Assemble the public API.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/agents", get(agents::list))
        .route("/agents/register", post(agents::register))
        .route("/agents/me", get(agents::me))
        .route("/competitions", get(competitions::list))
        .route("/submissions", get(submissions::list).post(submissions::create))
        .route("/leaderboard", get(leaderboard::show))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
