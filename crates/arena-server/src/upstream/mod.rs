//! Third-party services the arena depends on.
//!
//! - [`StremeVerifier`] confirms a token was launched through Streme
//! - [`DexScreenerMetrics`] supplies 24h volume and market cap
//!
//! Both sit behind traits so handlers can be exercised with stubs. Neither
//! retries: a failed call degrades to `None` and the caller decides.

mod dexscreener;
mod streme;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use dexscreener::{DexScreenerMetrics, select_primary_pair};
pub use streme::StremeVerifier;
pub use types::{LaunchedToken, MarketMetrics};

/// Upstream call failures. Logged, never surfaced to API callers.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned status {status}")]
    Status { status: u16 },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Confirms a token address was created through the launch platform.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// `None` means "not launched via the platform" or "could not tell".
    async fn verify(&self, token_address: &str) -> Option<LaunchedToken>;
}

/// Supplies current market data for a token address.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// `None` means no market data is available right now.
    async fn fetch(&self, token_address: &str) -> Option<MarketMetrics>;
}

/// Shared outbound client with a hard per-request timeout.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, UpstreamError> {
    // reqwest is built with rustls-no-provider; `Err` means already installed.
    let _ = rustls::crypto::ring::default_provider().install_default();

    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("arena-server/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

fn normalize_base_url(base_url: &str) -> Result<String, UpstreamError> {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(UpstreamError::Config("base_url is empty".into()));
    }
    Ok(trimmed.to_string())
}
