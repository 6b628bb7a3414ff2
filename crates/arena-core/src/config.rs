//! Configuration resolution for the arena server.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Optional JSON settings file
//! 3. Environment variables (`DATA_DIR`, `ARENA_*`)
//! 4. CLI arguments (highest priority, applied by the binary)

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Directory holding the store document.
    pub data_dir: PathBuf,
    pub listen_addr: SocketAddr,
    /// Base URL of the token launch registry (Streme).
    pub verifier_base_url: String,
    /// Base URL of the market data API (DexScreener).
    pub metrics_base_url: String,
    /// Chain whose trading pairs count for metrics.
    pub target_chain: String,
    /// Timeout applied to every outbound request.
    pub http_timeout_secs: u64,
    /// Age after which cached metrics are refetched.
    pub metrics_ttl_secs: u64,
    pub log_level: String,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            verifier_base_url: "https://api.streme.fun/api".to_string(),
            metrics_base_url: "https://api.dexscreener.com/latest/dex".to_string(),
            target_chain: "base".to_string(),
            http_timeout_secs: 10,
            metrics_ttl_secs: 5 * 60,
            log_level: "info".to_string(),
        }
    }
}

impl ArenaConfig {
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Staleness threshold for cached metrics.
    pub fn metrics_ttl(&self) -> Result<chrono::Duration> {
        i64::try_from(self.metrics_ttl_secs)
            .ok()
            .and_then(chrono::TimeDelta::try_seconds)
            .ok_or_else(|| {
                Error::Config(format!(
                    "metrics_ttl_secs {} is out of range",
                    self.metrics_ttl_secs
                ))
            })
    }
}

/// Settings file overlay; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    listen_addr: Option<SocketAddr>,
    verifier_base_url: Option<String>,
    metrics_base_url: Option<String>,
    target_chain: Option<String>,
    http_timeout_secs: Option<u64>,
    metrics_ttl_secs: Option<u64>,
    log_level: Option<String>,
}

/// Load configuration: defaults, then `settings` (if given), then environment.
pub fn load_config(settings: Option<&Path>) -> Result<ArenaConfig> {
    let mut config = ArenaConfig::default();

    if let Some(path) = settings {
        let overlay = load_config_file(path)?;
        merge_config(&mut config, overlay);
    }

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config.metrics_ttl()?;

    Ok(config)
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn merge_config(base: &mut ArenaConfig, overlay: ConfigFile) {
    if let Some(v) = overlay.data_dir {
        base.data_dir = v;
    }
    if let Some(v) = overlay.listen_addr {
        base.listen_addr = v;
    }
    if let Some(v) = overlay.verifier_base_url {
        base.verifier_base_url = v;
    }
    if let Some(v) = overlay.metrics_base_url {
        base.metrics_base_url = v;
    }
    if let Some(v) = overlay.target_chain {
        base.target_chain = v;
    }
    if let Some(v) = overlay.http_timeout_secs {
        base.http_timeout_secs = v;
    }
    if let Some(v) = overlay.metrics_ttl_secs {
        base.metrics_ttl_secs = v;
    }
    if let Some(v) = overlay.log_level {
        base.log_level = v;
    }
}

/// Apply environment overrides read through `lookup`.
///
/// Unparsable numeric or address values are ignored.
fn apply_env_overrides(config: &mut ArenaConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("DATA_DIR") {
        config.data_dir = PathBuf::from(val);
    }
    if let Some(val) = lookup("ARENA_LISTEN_ADDR") {
        if let Ok(addr) = val.parse() {
            config.listen_addr = addr;
        }
    }
    if let Some(val) = lookup("ARENA_VERIFIER_URL") {
        config.verifier_base_url = val;
    }
    if let Some(val) = lookup("ARENA_METRICS_URL") {
        config.metrics_base_url = val;
    }
    if let Some(val) = lookup("ARENA_HTTP_TIMEOUT_SECS") {
        if let Ok(n) = val.parse() {
            config.http_timeout_secs = n;
        }
    }
    if let Some(val) = lookup("ARENA_LOG_LEVEL") {
        config.log_level = val;
    }
}
