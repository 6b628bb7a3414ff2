//! Ranked leaderboard endpoint.

use arena_core::SortKey;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::error::ApiError;
use crate::leaderboard::{Leaderboard, LeaderboardQuery, assemble};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardParams {
    pub competition_id: Option<String>,
    pub sort_by: Option<String>,
    pub refresh: Option<String>,
}

impl LeaderboardParams {
    fn into_query(self) -> Result<LeaderboardQuery, ApiError> {
        let sort_by = match self.sort_by.as_deref() {
            None | Some("") => SortKey::default(),
            Some(raw) => raw.parse().map_err(ApiError::Validation)?,
        };
        Ok(LeaderboardQuery {
            competition_id: self.competition_id.filter(|id| !id.is_empty()),
            sort_by,
            force_refresh: self.refresh.as_deref() == Some("true"),
        })
    }
}

/// `GET /leaderboard`
pub async fn show(
    State(state): State<AppState>,
    params: Result<Query<LeaderboardParams>, QueryRejection>,
) -> Result<Json<Leaderboard>, ApiError> {
    let Query(params) = params?;
    let query = params.into_query()?;
    let board = assemble(
        &state.store,
        state.metrics.as_ref(),
        state.metrics_ttl,
        &query,
    )
    .await?;
    Ok(Json(board))
}
