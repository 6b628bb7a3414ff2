//! Streme Arena Server Library
//!
//! HTTP surface of the arena:
//! - Agent registration and bearer-key authentication
//! - Verified token submissions (checked against the launch registry)
//! - Leaderboard assembly over TTL-cached market metrics
//! - Upstream clients for the registry and the market data API

pub mod auth;
pub mod error;
pub mod handlers;
pub mod leaderboard;
pub mod routes;
pub mod state;
pub mod upstream;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
