//! Data model persisted in the arena document.
//!
//! Field names serialise in camelCase so the on-disk document reads
//! `{ agents, submissions, competitions, metrics }` with JS-style keys.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a registered agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Registered,
    /// Set on the first verified submission.
    Active,
    /// Administrative only; no handler sets it.
    Disqualified,
}

/// A registered participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    /// Lower-cased `0x` address, unique across agents.
    pub wallet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Plaintext bearer secret, shown to the caller once.
    pub api_key: String,
    pub registered_at: DateTime<Utc>,
    pub status: AgentStatus,
}

/// One agent's token entered into one competition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub agent_id: String,
    /// Lower-cased `0x` address.
    pub token_address: String,
    pub token_name: String,
    pub token_symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_tx: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub verified: bool,
    pub competition_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionStatus {
    Upcoming,
    Active,
    Ended,
}

impl CompetitionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for CompetitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompetitionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "active" => Ok(Self::Active),
            "ended" => Ok(Self::Ended),
            other => Err(format!(
                "Unknown competition status '{other}' (expected upcoming, active or ended)"
            )),
        }
    }
}

/// Metric a leaderboard can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "volume24h")]
    Volume24h,
    #[serde(rename = "holders")]
    Holders,
    #[serde(rename = "marketCap")]
    MarketCap,
}

impl SortKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Volume24h => "volume24h",
            Self::Holders => "holders",
            Self::MarketCap => "marketCap",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "volume24h" => Ok(Self::Volume24h),
            "holders" => Ok(Self::Holders),
            "marketCap" => Ok(Self::MarketCap),
            other => Err(format!(
                "Unknown sort key '{other}' (expected volume24h, holders or marketCap)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrizeTier {
    pub place: u32,
    pub amount: String,
    pub label: String,
}

/// A time-bounded contest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub prize_pool: String,
    #[serde(default)]
    pub prizes: Vec<PrizeTier>,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default)]
    pub ranking_metric: SortKey,
    pub status: CompetitionStatus,
}

impl Competition {
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now > self.ends_at
    }
}

/// Cached market data for one token address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetrics {
    pub token_address: String,
    pub volume24h: f64,
    pub holders: u64,
    pub market_cap: f64,
    pub last_updated: DateTime<Utc>,
}

impl TokenMetrics {
    /// True once the entry is older than `ttl`.
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now.signed_duration_since(self.last_updated) > ttl
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub submissions: Vec<Submission>,
    #[serde(default)]
    pub competitions: Vec<Competition>,
    #[serde(default)]
    pub metrics: Vec<TokenMetrics>,
}
