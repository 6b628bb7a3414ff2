//! Upstream payloads and the values mapped out of them.

use serde::{Deserialize, Serialize};

/// Token record confirmed by the launch registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchedToken {
    pub address: String,
    pub name: String,
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Market data for the token's primary trading pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMetrics {
    pub volume24h: f64,
    /// Always 0: the market data API has no holder counts.
    pub holders: u64,
    pub market_cap: f64,
    pub price_usd: f64,
    pub liquidity: f64,
}

/// `GET /tokens/{address}` body from the Streme API.
///
/// Field spellings vary between records, so both variants are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct StremeTokenBody {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub deployer: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at_camel: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<serde_json::Value>,
    #[serde(default)]
    pub image: Option<String>,
}

/// `GET /tokens/{address}` body from DexScreener.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DexTokensBody {
    #[serde(default)]
    pub pairs: Option<Vec<DexPair>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexPair {
    #[serde(default)]
    pub chain_id: String,
    #[serde(default)]
    pub pair_address: Option<String>,
    #[serde(default)]
    pub price_usd: Option<String>,
    #[serde(default)]
    pub liquidity: Option<DexLiquidity>,
    #[serde(default)]
    pub volume: Option<DexVolume>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub fdv: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DexLiquidity {
    #[serde(default)]
    pub usd: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DexVolume {
    #[serde(default)]
    pub h24: Option<f64>,
}

impl DexPair {
    pub fn liquidity_usd(&self) -> f64 {
        self.liquidity.as_ref().and_then(|l| l.usd).unwrap_or(0.0)
    }
}
