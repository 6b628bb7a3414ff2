//! Lookups and mutations over an in-memory [`Database`] document.

use crate::ids::api_key_matches;
use crate::models::{
    Agent, AgentStatus, Competition, CompetitionStatus, Database, Submission, TokenMetrics,
};

impl Database {
    /// Case-insensitive wallet lookup.
    pub fn agent_by_wallet(&self, wallet: &str) -> Option<&Agent> {
        self.agents
            .iter()
            .find(|a| a.wallet.eq_ignore_ascii_case(wallet))
    }

    /// Agent holding the presented bearer key.
    pub fn agent_by_api_key(&self, api_key: &str) -> Option<&Agent> {
        self.agents
            .iter()
            .find(|a| api_key_matches(&a.api_key, api_key))
    }

    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Promote an agent to `active`. Returns true if the status changed.
    pub fn activate_agent(&mut self, id: &str) -> bool {
        match self.agents.iter_mut().find(|a| a.id == id) {
            Some(agent) if agent.status == AgentStatus::Registered => {
                agent.status = AgentStatus::Active;
                true
            }
            _ => false,
        }
    }

    pub fn competition(&self, id: &str) -> Option<&Competition> {
        self.competitions.iter().find(|c| c.id == id)
    }

    /// First competition still open to entries (active or upcoming).
    pub fn open_competition(&self) -> Option<&Competition> {
        self.competitions.iter().find(|c| {
            matches!(
                c.status,
                CompetitionStatus::Active | CompetitionStatus::Upcoming
            )
        })
    }

    /// First active competition, else the first one stored.
    pub fn featured_competition(&self) -> Option<&Competition> {
        self.competitions
            .iter()
            .find(|c| c.status == CompetitionStatus::Active)
            .or_else(|| self.competitions.first())
    }

    /// Submissions entered in one competition, in submission order.
    pub fn submissions_in<'a>(
        &'a self,
        competition_id: &str,
    ) -> impl Iterator<Item = &'a Submission> {
        self.submissions
            .iter()
            .filter(move |s| s.competition_id == competition_id)
    }

    pub fn submissions_by<'a>(&'a self, agent_id: &str) -> impl Iterator<Item = &'a Submission> {
        self.submissions
            .iter()
            .filter(move |s| s.agent_id == agent_id)
    }

    /// The agent's entry in a competition, if any.
    pub fn entry_of(&self, agent_id: &str, competition_id: &str) -> Option<&Submission> {
        self.submissions
            .iter()
            .find(|s| s.competition_id == competition_id && s.agent_id == agent_id)
    }

    /// Submission that already claimed `token_address` in a competition.
    pub fn claim_on(&self, token_address: &str, competition_id: &str) -> Option<&Submission> {
        self.submissions.iter().find(|s| {
            s.competition_id == competition_id
                && s.token_address.eq_ignore_ascii_case(token_address)
        })
    }

    /// Number of distinct agents with an entry in the competition.
    pub fn participant_count(&self, competition_id: &str) -> usize {
        let mut agents: Vec<&str> = self
            .submissions_in(competition_id)
            .map(|s| s.agent_id.as_str())
            .collect();
        agents.sort_unstable();
        agents.dedup();
        agents.len()
    }

    pub fn metrics_for(&self, token_address: &str) -> Option<&TokenMetrics> {
        self.metrics
            .iter()
            .find(|m| m.token_address == token_address)
    }

    /// Replace the cache entry for the token in place, or append a new one.
    pub fn upsert_metrics(&mut self, entry: TokenMetrics) {
        match self
            .metrics
            .iter_mut()
            .find(|m| m.token_address == entry.token_address)
        {
            Some(existing) => *existing = entry,
            None => self.metrics.push(entry),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::SortKey;

    fn competition(id: &str, status: CompetitionStatus) -> Competition {
        let now = Utc::now();
        Competition {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            starts_at: now,
            ends_at: now,
            prize_pool: String::new(),
            prizes: Vec::new(),
            rules: Vec::new(),
            ranking_metric: SortKey::Volume24h,
            status,
        }
    }

    fn agent(id: &str, wallet: &str) -> Agent {
        Agent {
            id: id.into(),
            name: id.into(),
            wallet: wallet.into(),
            fid: None,
            platform: None,
            api_key: format!("arena_{id}"),
            registered_at: Utc::now(),
            status: AgentStatus::Registered,
        }
    }

    fn submission(id: &str, agent_id: &str, token: &str, competition_id: &str) -> Submission {
        Submission {
            id: id.into(),
            agent_id: agent_id.into(),
            token_address: token.into(),
            token_name: "T".into(),
            token_symbol: "T".into(),
            launch_tx: None,
            submitted_at: Utc::now(),
            verified: true,
            competition_id: competition_id.into(),
        }
    }

    fn metrics(token: &str, volume: f64) -> TokenMetrics {
        TokenMetrics {
            token_address: token.into(),
            volume24h: volume,
            holders: 0,
            market_cap: 0.0,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn wallet_lookup_ignores_case() {
        let db = Database {
            agents: vec![agent("a1", "0xabcdef")],
            ..Database::default()
        };
        assert_eq!(db.agent_by_wallet("0xABCDEF").unwrap().id, "a1");
        assert!(db.agent_by_wallet("0xabcdee").is_none());
    }

    #[test]
    fn api_key_lookup() {
        let db = Database {
            agents: vec![agent("a1", "0x1"), agent("a2", "0x2")],
            ..Database::default()
        };
        assert_eq!(db.agent_by_api_key("arena_a2").unwrap().id, "a2");
        assert!(db.agent_by_api_key("arena_a3").is_none());
    }

    #[test]
    fn activation_only_from_registered() {
        let mut db = Database {
            agents: vec![agent("a1", "0x1")],
            ..Database::default()
        };
        assert!(db.activate_agent("a1"));
        assert_eq!(db.agents[0].status, AgentStatus::Active);
        assert!(!db.activate_agent("a1"));
        assert!(!db.activate_agent("missing"));
    }

    #[test]
    fn open_competition_skips_ended() {
        let db = Database {
            competitions: vec![
                competition("old", CompetitionStatus::Ended),
                competition("next", CompetitionStatus::Upcoming),
                competition("live", CompetitionStatus::Active),
            ],
            ..Database::default()
        };
        assert_eq!(db.open_competition().unwrap().id, "next");
    }

    #[test]
    fn featured_prefers_active_then_first() {
        let mut db = Database {
            competitions: vec![
                competition("old", CompetitionStatus::Ended),
                competition("live", CompetitionStatus::Active),
            ],
            ..Database::default()
        };
        assert_eq!(db.featured_competition().unwrap().id, "live");
        db.competitions[1].status = CompetitionStatus::Ended;
        assert_eq!(db.featured_competition().unwrap().id, "old");
        db.competitions.clear();
        assert!(db.featured_competition().is_none());
    }

    #[test]
    fn entry_and_claim_lookups_are_scoped_to_competition() {
        let db = Database {
            submissions: vec![
                submission("s1", "a1", "0xaaa", "c1"),
                submission("s2", "a2", "0xbbb", "c2"),
            ],
            ..Database::default()
        };
        assert_eq!(db.entry_of("a1", "c1").unwrap().id, "s1");
        assert!(db.entry_of("a1", "c2").is_none());
        assert_eq!(db.claim_on("0xAAA", "c1").unwrap().id, "s1");
        assert!(db.claim_on("0xaaa", "c2").is_none());
    }

    #[test]
    fn lookups_outlive_the_key_arguments() {
        let db = Database {
            submissions: vec![submission("s1", "a1", "0xaaa", "c1")],
            ..Database::default()
        };
        let entry = db.entry_of(&String::from("a1"), &String::from("c1"));
        let claim = db.claim_on(&String::from("0xaaa"), &String::from("c1"));
        let listed: Vec<&Submission> = db.submissions_in(&String::from("c1")).collect();
        assert_eq!(entry.unwrap().id, "s1");
        assert_eq!(claim.unwrap().id, "s1");
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn participants_are_distinct_agents() {
        let db = Database {
            submissions: vec![
                submission("s1", "a1", "0x1", "c1"),
                submission("s2", "a1", "0x2", "c1"),
                submission("s3", "a2", "0x3", "c1"),
                submission("s4", "a3", "0x4", "c2"),
            ],
            ..Database::default()
        };
        assert_eq!(db.participant_count("c1"), 2);
        assert_eq!(db.submissions_in("c1").count(), 3);
        assert_eq!(db.submissions_by("a1").count(), 2);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut db = Database::default();
        db.upsert_metrics(metrics("0x1", 1.0));
        db.upsert_metrics(metrics("0x2", 2.0));
        db.upsert_metrics(metrics("0x1", 10.0));
        assert_eq!(db.metrics.len(), 2);
        assert_eq!(db.metrics[0].token_address, "0x1");
        assert!((db.metrics_for("0x1").unwrap().volume24h - 10.0).abs() < f64::EPSILON);
    }
}
