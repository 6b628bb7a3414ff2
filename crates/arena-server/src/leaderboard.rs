//! Leaderboard assembly.
//!
//! Joins a competition's submissions with their agents and cached metrics,
//! refreshing stale cache entries from the [`MetricsSource`], then ranks the
//! entries by the requested metric.

use arena_core::{
    Competition, CompetitionStatus, Database, SortKey, Store, Submission, TokenMetrics,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::upstream::MetricsSource;

/// What to rank and how.
#[derive(Debug, Clone, Default)]
pub struct LeaderboardQuery {
    /// Explicit competition; defaults to the featured one.
    pub competition_id: Option<String>,
    pub sort_by: SortKey,
    /// Refetch every entry's metrics regardless of age.
    pub force_refresh: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionSummary {
    pub id: String,
    pub name: String,
    pub status: CompetitionStatus,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub prize_pool: String,
}

impl From<&Competition> for CompetitionSummary {
    fn from(c: &Competition) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            status: c.status,
            starts_at: c.starts_at,
            ends_at: c.ends_at,
            prize_pool: c.prize_pool.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMetrics {
    pub volume24h: f64,
    pub holders: u64,
    pub market_cap: f64,
    pub last_updated: DateTime<Utc>,
}

impl From<&TokenMetrics> for EntryMetrics {
    fn from(m: &TokenMetrics) -> Self {
        Self {
            volume24h: m.volume24h,
            holders: m.holders,
            market_cap: m.market_cap,
            last_updated: m.last_updated,
        }
    }
}

impl EntryMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn value(&self, key: SortKey) -> f64 {
        match key {
            SortKey::Volume24h => self.volume24h,
            SortKey::Holders => self.holders as f64,
            SortKey::MarketCap => self.market_cap,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    pub agent_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_wallet: Option<String>,
    pub token_address: String,
    pub token_name: String,
    pub token_symbol: String,
    pub submitted_at: DateTime<Utc>,
    pub verified: bool,
    pub metrics: Option<EntryMetrics>,
}

impl LeaderboardEntry {
    fn new(db: &Database, submission: &Submission, metrics: Option<&TokenMetrics>) -> Self {
        let agent = db.agent(&submission.agent_id);
        Self {
            rank: 0,
            agent_id: agent.map(|a| a.id.clone()),
            agent_name: agent.map_or_else(|| "Unknown".to_string(), |a| a.name.clone()),
            agent_wallet: agent.map(|a| a.wallet.clone()),
            token_address: submission.token_address.clone(),
            token_name: submission.token_name.clone(),
            token_symbol: submission.token_symbol.clone(),
            submitted_at: submission.submitted_at,
            verified: submission.verified,
            metrics: metrics.map(EntryMetrics::from),
        }
    }

    /// Ranking value; missing metrics count as zero.
    pub fn score(&self, key: SortKey) -> f64 {
        self.metrics.as_ref().map_or(0.0, |m| m.value(key))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    pub competition: CompetitionSummary,
    pub sorted_by: SortKey,
    pub participant_count: usize,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Sort descending by `key` and assign 1-based ranks.
///
/// The sort is stable: equal scores keep submission order.
pub fn rank_entries(entries: &mut [LeaderboardEntry], key: SortKey) {
    entries.sort_by(|a, b| b.score(key).total_cmp(&a.score(key)));
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i + 1;
    }
}

fn needs_refresh(
    cached: Option<&TokenMetrics>,
    force: bool,
    now: DateTime<Utc>,
    ttl: chrono::Duration,
) -> bool {
    force || cached.is_none_or(|m| m.is_stale(now, ttl))
}

/// Build the ranked leaderboard, refreshing stale metrics on the way.
///
/// The store lock is released while metrics are fetched. Fresh values are
/// merged into a reloaded document and written at most once.
pub async fn assemble(
    store: &Store,
    source: &dyn MetricsSource,
    ttl: chrono::Duration,
    query: &LeaderboardQuery,
) -> Result<Leaderboard, ApiError> {
    let (competition, stale) = {
        let db = store.lock().await.load().await?;
        let competition = resolve_competition(&db, query.competition_id.as_deref())?;
        let now = Utc::now();
        let stale: Vec<String> = db
            .submissions_in(&competition.id)
            .map(|s| s.token_address.clone())
            .filter(|address| {
                needs_refresh(db.metrics_for(address), query.force_refresh, now, ttl)
            })
            .collect();
        (competition, stale)
    };

    let mut fresh = Vec::with_capacity(stale.len());
    for address in stale {
        match source.fetch(&address).await {
            Some(m) => fresh.push(TokenMetrics {
                token_address: address,
                volume24h: m.volume24h,
                holders: m.holders,
                market_cap: m.market_cap,
                last_updated: Utc::now(),
            }),
            None => debug!(token = %address, "No fresh metrics; keeping cache"),
        }
    }
    let refreshed = fresh.len();

    let guard = store.lock().await;
    let mut db = guard.load().await?;
    if refreshed > 0 {
        for entry in fresh {
            db.upsert_metrics(entry);
        }
        guard.save(&db).await?;
    }
    drop(guard);

    let mut entries: Vec<LeaderboardEntry> = db
        .submissions_in(&competition.id)
        .map(|s| LeaderboardEntry::new(&db, s, db.metrics_for(&s.token_address)))
        .collect();
    rank_entries(&mut entries, query.sort_by);

    info!(
        competition = %competition.id,
        entries = entries.len(),
        refreshed,
        sort_by = %query.sort_by,
        "Leaderboard assembled"
    );

    Ok(Leaderboard {
        competition: CompetitionSummary::from(&competition),
        sorted_by: query.sort_by,
        participant_count: entries.len(),
        leaderboard: entries,
    })
}

fn resolve_competition(db: &Database, id: Option<&str>) -> Result<Competition, ApiError> {
    match id {
        Some(id) => db.competition(id),
        None => db.featured_competition(),
    }
    .cloned()
    .ok_or_else(|| ApiError::NotFound("No competition found".into()))
}
