//! HTTP request handlers, one module per resource.

pub mod agents;
pub mod competitions;
pub mod leaderboard;
pub mod submissions;

use axum::Json;
use serde_json::{Value, json};

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
