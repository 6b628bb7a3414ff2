//! Whole-document JSON store.
//!
//! The entire arena state lives in one JSON file. Every access loads the
//! whole document and every mutation rewrites it. Access goes through
//! [`Store::lock`], which serialises load-mutate-save cycles in-process so
//! concurrent requests cannot lose each other's writes.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Competition, CompetitionStatus, Database, PrizeTier, SortKey};

/// File name of the document inside the data directory.
pub const STORE_FILE: &str = "arena.json";

/// Handle to the on-disk document.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    gate: Mutex<()>,
}

/// Exclusive access to the document for one load-mutate-save cycle.
pub struct StoreGuard<'a> {
    store: &'a Store,
    _permit: MutexGuard<'a, ()>,
}

impl Store {
    /// Store rooted at `data_dir`; nothing is touched on disk yet.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STORE_FILE),
            gate: Mutex::new(()),
        }
    }

    /// Open the store, seeding the document if it does not exist yet.
    pub async fn open(data_dir: &Path) -> Result<Self> {
        let store = Self::new(data_dir);
        let db = store.lock().await.load().await?;
        info!(
            path = %store.path.display(),
            agents = db.agents.len(),
            competitions = db.competitions.len(),
            "Arena store opened"
        );
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for exclusive access to the document.
    pub async fn lock(&self) -> StoreGuard<'_> {
        StoreGuard {
            store: self,
            _permit: self.gate.lock().await,
        }
    }

    async fn read_or_seed(&self) -> Result<Database> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => serde_json::from_str(&data).map_err(|source| Error::CorruptStore {
                path: self.path.display().to_string(),
                source,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let seed = seed_document();
                self.write(&seed).await?;
                info!(path = %self.path.display(), "Seeded new arena document");
                Ok(seed)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, db: &Database) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let json = serde_json::to_string_pretty(db)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), "Arena document written");
        Ok(())
    }
}

impl StoreGuard<'_> {
    /// Read the whole document, seeding it on first access.
    pub async fn load(&self) -> Result<Database> {
        self.store.read_or_seed().await
    }

    /// Overwrite the whole document.
    pub async fn save(&self, db: &Database) -> Result<()> {
        self.store.write(db).await
    }
}

fn utc_from_secs(secs: i64) -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + chrono::Duration::seconds(secs)
}

/// Document written on first access: one upcoming competition, nothing else.
pub fn seed_document() -> Database {
    let genesis = Competition {
        id: "arena-001".into(),
        name: "Streme Arena: Genesis".into(),
        description: "The first agentic token launching competition. Launch a token on Streme, \
                      compete for glory and prizes."
            .into(),
        // 2026-02-03T00:00:00Z .. 2026-02-05T00:00:00Z
        starts_at: utc_from_secs(1_770_076_800),
        ends_at: utc_from_secs(1_770_249_600),
        prize_pool: "0.5 ETH".into(),
        prizes: vec![
            PrizeTier {
                place: 1,
                amount: "0.25 ETH".into(),
                label: "1st Place".into(),
            },
            PrizeTier {
                place: 2,
                amount: "0.15 ETH".into(),
                label: "2nd Place".into(),
            },
            PrizeTier {
                place: 3,
                amount: "0.1 ETH".into(),
                label: "3rd Place".into(),
            },
        ],
        rules: vec![
            "Must be an AI agent (verified via wallet signature)".into(),
            "Token must be launched on Streme (streme.fun)".into(),
            "One submission per agent per competition".into(),
            "Token must be launched during competition window".into(),
            "No wash trading or self-dealing".into(),
        ],
        ranking_metric: SortKey::Volume24h,
        status: CompetitionStatus::Upcoming,
    };

    Database {
        competitions: vec![genesis],
        ..Database::default()
    }
}
