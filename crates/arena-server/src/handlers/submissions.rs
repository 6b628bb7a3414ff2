//! Token submissions.

use arena_core::ids::{generate_id, is_valid_address};
use arena_core::{Agent, Database, Submission};
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::authenticate;
use crate::error::ApiError;
use crate::state::AppState;
use crate::upstream::types::LaunchedToken;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub token_address: Option<String>,
    pub token_name: Option<String>,
    pub token_symbol: Option<String>,
    pub launch_tx: Option<String>,
    pub competition_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFilter {
    pub competition_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionView {
    #[serde(flatten)]
    pub submission: Submission,
    pub agent_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_wallet: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionList {
    pub count: usize,
    pub submissions: Vec<SubmissionView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedSubmission {
    pub id: String,
    pub token_address: String,
    pub token_name: String,
    pub token_symbol: String,
    pub competition_id: String,
    pub submitted_at: DateTime<Utc>,
    pub verified: bool,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub submission: AcceptedSubmission,
    pub token: LaunchedToken,
    pub message: String,
}

/// `GET /submissions`
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<SubmissionFilter>, QueryRejection>,
) -> Result<Json<SubmissionList>, ApiError> {
    let Query(filter) = query?;
    let competition_id = filter.competition_id.filter(|id| !id.is_empty());
    let db = state.store.lock().await.load().await?;
    let submissions: Vec<SubmissionView> = db
        .submissions
        .iter()
        .filter(|s| {
            competition_id
                .as_deref()
                .is_none_or(|id| s.competition_id == id)
        })
        .map(|s| {
            let agent = db.agent(&s.agent_id);
            SubmissionView {
                submission: s.clone(),
                agent_name: agent.map_or_else(|| "Unknown".to_string(), |a| a.name.clone()),
                agent_wallet: agent.map(|a| a.wallet.clone()),
            }
        })
        .collect();
    Ok(Json(SubmissionList {
        count: submissions.len(),
        submissions,
    }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Competition checks and record creation, run under the store lock.
fn admit(
    db: &mut Database,
    agent: &Agent,
    req: SubmitRequest,
    token_address: String,
    token: &LaunchedToken,
    now: DateTime<Utc>,
) -> Result<Submission, ApiError> {
    let competition = match req.competition_id.as_deref() {
        Some(id) => db.competition(id),
        None => db.open_competition(),
    }
    .ok_or_else(|| ApiError::NotFound("No active competition found".into()))?;

    if competition.has_ended(now) {
        return Err(ApiError::CompetitionEnded(format!(
            "Competition {} has ended",
            competition.id
        )));
    }
    let competition_id = competition.id.clone();

    if let Some(existing) = db.entry_of(&agent.id, &competition_id) {
        return Err(ApiError::conflict(
            "Already submitted to this competition",
            "submissionId",
            existing.id.clone(),
        ));
    }
    if let Some(claim) = db.claim_on(&token_address, &competition_id) {
        return Err(ApiError::conflict(
            "Token already submitted by another agent",
            "submissionId",
            claim.id.clone(),
        ));
    }

    let submission = Submission {
        id: generate_id(),
        agent_id: agent.id.clone(),
        token_address,
        token_name: non_blank(req.token_name).unwrap_or_else(|| token.name.clone()),
        token_symbol: non_blank(req.token_symbol).unwrap_or_else(|| token.symbol.clone()),
        launch_tx: non_blank(req.launch_tx),
        submitted_at: now,
        verified: true,
        competition_id,
    };
    db.submissions.push(submission.clone());
    if db.activate_agent(&agent.id) {
        info!(agent_id = %agent.id, "Agent activated");
    }
    Ok(submission)
}

/// `POST /submissions`
///
/// The registry lookup runs without the store lock held; everything after it
/// reloads the document and re-checks under the lock.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    {
        let db = state.store.lock().await.load().await?;
        authenticate(&db, &headers)?;
    }

    let Json(req) = body?;
    let token_address = req.token_address.clone().unwrap_or_default();
    if token_address.is_empty() {
        return Err(ApiError::Validation("tokenAddress is required".into()));
    }
    if !is_valid_address(&token_address) {
        return Err(ApiError::Validation("Invalid token address".into()));
    }
    let token_address = token_address.to_ascii_lowercase();

    let Some(token) = state.verifier.verify(&token_address).await else {
        warn!(token = %token_address, "Submission rejected: token not found on Streme");
        return Err(ApiError::TokenNotLaunched(
            "Token not found on Streme. Only tokens launched via streme.fun are eligible.".into(),
        ));
    };

    let guard = state.store.lock().await;
    let mut db = guard.load().await?;
    // The key may have been revoked while the lookup was in flight.
    let agent = authenticate(&db, &headers)?.clone();
    let submission = admit(&mut db, &agent, req, token_address, &token, Utc::now())?;
    guard.save(&db).await?;
    drop(guard);

    info!(
        submission_id = %submission.id,
        agent_id = %agent.id,
        token = %submission.token_address,
        competition = %submission.competition_id,
        "Token submitted"
    );

    Ok(Json(SubmitResponse {
        success: true,
        submission: AcceptedSubmission {
            id: submission.id,
            token_address: submission.token_address,
            token_name: submission.token_name,
            token_symbol: submission.token_symbol,
            competition_id: submission.competition_id,
            submitted_at: submission.submitted_at,
            verified: submission.verified,
        },
        token,
        message: "Token verified and submitted! It will appear on the leaderboard.".into(),
    }))
}
