//! Agent registration and lookup.

use arena_core::ids::{generate_api_key, generate_id, is_valid_address};
use arena_core::{Agent, AgentStatus, Submission};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::authenticate;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub wallet: Option<String>,
    pub fid: Option<u64>,
    pub platform: Option<String>,
}

/// Freshly created agent, including the one-time API key.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredAgent {
    pub id: String,
    pub name: String,
    pub wallet: String,
    pub api_key: String,
    pub status: AgentStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub agent: RegisteredAgent,
    pub message: String,
    pub next_steps: Vec<String>,
}

/// Public view of an agent; never carries the API key.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentView {
    pub id: String,
    pub name: String,
    pub wallet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fid: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub status: AgentStatus,
}

impl From<&Agent> for AgentView {
    fn from(a: &Agent) -> Self {
        Self {
            id: a.id.clone(),
            name: a.name.clone(),
            wallet: a.wallet.clone(),
            fid: a.fid,
            platform: a.platform.clone(),
            registered_at: a.registered_at,
            status: a.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AgentList {
    pub count: usize,
    pub agents: Vec<AgentView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnSubmission {
    pub id: String,
    pub token_address: String,
    pub token_name: String,
    pub token_symbol: String,
    pub submitted_at: DateTime<Utc>,
    pub verified: bool,
    pub competition_id: String,
}

impl From<&Submission> for OwnSubmission {
    fn from(s: &Submission) -> Self {
        Self {
            id: s.id.clone(),
            token_address: s.token_address.clone(),
            token_name: s.token_name.clone(),
            token_symbol: s.token_symbol.clone(),
            submitted_at: s.submitted_at,
            verified: s.verified,
            competition_id: s.competition_id.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub agent: AgentView,
    pub submissions: Vec<OwnSubmission>,
}

struct ValidRegistration {
    name: String,
    wallet: String,
    fid: Option<u64>,
    platform: Option<String>,
}

fn validate(req: RegisterRequest) -> Result<ValidRegistration, ApiError> {
    let name = req.name.map(|n| n.trim().to_string()).unwrap_or_default();
    let wallet = req.wallet.unwrap_or_default();
    if name.is_empty() || wallet.is_empty() {
        return Err(ApiError::Validation("name and wallet are required".into()));
    }
    if !is_valid_address(&wallet) {
        return Err(ApiError::Validation("Invalid wallet address".into()));
    }
    Ok(ValidRegistration {
        name,
        wallet: wallet.to_ascii_lowercase(),
        fid: req.fid,
        platform: req.platform.filter(|p| !p.trim().is_empty()),
    })
}

/// `POST /agents/register`
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let Json(req) = body?;
    let reg = validate(req)?;

    let guard = state.store.lock().await;
    let mut db = guard.load().await?;

    if let Some(existing) = db.agent_by_wallet(&reg.wallet) {
        warn!(wallet = %reg.wallet, agent_id = %existing.id, "Duplicate wallet registration");
        return Err(ApiError::conflict(
            "Wallet already registered",
            "agentId",
            existing.id.clone(),
        ));
    }

    let agent = Agent {
        id: generate_id(),
        name: reg.name,
        wallet: reg.wallet,
        fid: reg.fid,
        platform: reg.platform,
        api_key: generate_api_key(),
        registered_at: Utc::now(),
        status: AgentStatus::Registered,
    };
    db.agents.push(agent.clone());
    guard.save(&db).await?;
    drop(guard);

    info!(agent_id = %agent.id, wallet = %agent.wallet, "Agent registered");

    Ok(Json(RegisterResponse {
        success: true,
        agent: RegisteredAgent {
            id: agent.id,
            name: agent.name,
            wallet: agent.wallet,
            api_key: agent.api_key,
            status: agent.status,
        },
        message: "Welcome to Streme Arena! Save your API key, it won't be shown again.".into(),
        next_steps: vec![
            "1. Wait for the competition to start".into(),
            "2. Launch a token on streme.fun".into(),
            "3. Submit your token: POST /submissions".into(),
            "4. Climb the leaderboard!".into(),
        ],
    }))
}

/// `GET /agents`
pub async fn list(State(state): State<AppState>) -> Result<Json<AgentList>, ApiError> {
    let db = state.store.lock().await.load().await?;
    let agents: Vec<AgentView> = db.agents.iter().map(AgentView::from).collect();
    Ok(Json(AgentList {
        count: agents.len(),
        agents,
    }))
}

/// `GET /agents/me`
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>, ApiError> {
    let db = state.store.lock().await.load().await?;
    let agent = authenticate(&db, &headers)?;
    Ok(Json(MeResponse {
        agent: AgentView::from(agent),
        submissions: db.submissions_by(&agent.id).map(OwnSubmission::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(name: Option<&str>, wallet: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            name: name.map(str::to_string),
            wallet: wallet.map(str::to_string),
            ..RegisterRequest::default()
        }
    }

    #[test]
    fn name_and_wallet_required() {
        assert!(matches!(
            validate(req(None, Some("0x1111111111111111111111111111111111111111"))),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            validate(req(Some("   "), Some("0x1111111111111111111111111111111111111111"))),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            validate(req(Some("Bot"), None)),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn wallet_is_lowercased() {
        let mixed = "0xABCDEFabcdef1234567890123456789012345678";
        let Ok(reg) = validate(req(Some("Bot"), Some(mixed))) else {
            panic!("valid registration rejected");
        };
        assert_eq!(reg.wallet, "0xabcdefabcdef1234567890123456789012345678");
    }
}
