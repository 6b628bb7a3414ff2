//! Competition listing.

use arena_core::{Competition, CompetitionStatus, Database};
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CompetitionFilter {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionView {
    #[serde(flatten)]
    pub competition: Competition,
    pub participant_count: usize,
    pub submission_count: usize,
}

#[derive(Debug, Serialize)]
pub struct CompetitionList {
    pub count: usize,
    pub competitions: Vec<CompetitionView>,
}

/// An empty `status` means no filter.
fn parse_status(raw: Option<&str>) -> Result<Option<CompetitionStatus>, ApiError> {
    raw.filter(|v| !v.is_empty())
        .map(str::parse::<CompetitionStatus>)
        .transpose()
        .map_err(ApiError::Validation)
}

fn with_counts(db: &Database, competition: &Competition) -> CompetitionView {
    CompetitionView {
        competition: competition.clone(),
        participant_count: db.participant_count(&competition.id),
        submission_count: db.submissions_in(&competition.id).count(),
    }
}

/// `GET /competitions`
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<CompetitionFilter>, QueryRejection>,
) -> Result<Json<CompetitionList>, ApiError> {
    let Query(filter) = query?;
    let status = parse_status(filter.status.as_deref())?;
    let db = state.store.lock().await.load().await?;
    let competitions: Vec<CompetitionView> = db
        .competitions
        .iter()
        .filter(|c| status.is_none_or(|s| c.status == s))
        .map(|c| with_counts(&db, c))
        .collect();
    Ok(Json(CompetitionList {
        count: competitions.len(),
        competitions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_parsing() {
        assert!(matches!(parse_status(None), Ok(None)));
        assert!(matches!(parse_status(Some("")), Ok(None)));
        assert!(matches!(
            parse_status(Some("active")),
            Ok(Some(CompetitionStatus::Active))
        ));
        assert!(matches!(
            parse_status(Some("finished")),
            Err(ApiError::Validation(_))
        ));
    }
}
