//! DexScreener market data client.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::types::{DexPair, DexTokensBody, MarketMetrics};
use super::{MetricsSource, UpstreamError, normalize_base_url};

/// Fetches per-token market data, restricted to one chain.
#[derive(Debug, Clone)]
pub struct DexScreenerMetrics {
    http: reqwest::Client,
    base_url: String,
    chain: String,
}

impl DexScreenerMetrics {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        chain: impl Into<String>,
    ) -> Result<Self, UpstreamError> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            chain: chain.into(),
        })
    }

    pub async fn pairs(&self, token_address: &str) -> Result<Vec<DexPair>, UpstreamError> {
        let url = format!("{}/tokens/{token_address}", self.base_url);
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }
        let body: DexTokensBody = resp.json().await?;
        Ok(body.pairs.unwrap_or_default())
    }
}

/// Deepest pair on `chain`. Missing liquidity counts as zero; the first pair
/// wins a tie.
pub fn select_primary_pair<'a>(pairs: &'a [DexPair], chain: &str) -> Option<&'a DexPair> {
    pairs
        .iter()
        .filter(|p| p.chain_id == chain)
        .fold(None, |best: Option<&DexPair>, pair| match best {
            Some(b) if b.liquidity_usd() >= pair.liquidity_usd() => Some(b),
            _ => Some(pair),
        })
}

fn nonzero(v: f64) -> Option<f64> {
    (v.is_finite() && v.abs() > 0.0).then_some(v)
}

fn to_metrics(pair: &DexPair) -> MarketMetrics {
    MarketMetrics {
        volume24h: pair.volume.as_ref().and_then(|v| v.h24).unwrap_or(0.0),
        holders: 0,
        market_cap: pair
            .market_cap
            .and_then(nonzero)
            .or_else(|| pair.fdv.and_then(nonzero))
            .unwrap_or(0.0),
        price_usd: pair
            .price_usd
            .as_deref()
            .and_then(|p| p.trim().parse::<f64>().ok())
            .and_then(nonzero)
            .unwrap_or(0.0),
        liquidity: pair.liquidity_usd(),
    }
}

#[async_trait]
impl MetricsSource for DexScreenerMetrics {
    async fn fetch(&self, token_address: &str) -> Option<MarketMetrics> {
        let pairs = match self.pairs(token_address).await {
            Ok(pairs) => pairs,
            Err(e) => {
                warn!(token = %token_address, error = %e, "DexScreener fetch failed");
                return None;
            }
        };
        let Some(pair) = select_primary_pair(&pairs, &self.chain) else {
            debug!(
                token = %token_address,
                chain = %self.chain,
                pairs = pairs.len(),
                "No trading pair on chain"
            );
            return None;
        };
        debug!(
            token = %token_address,
            pair = pair.pair_address.as_deref().unwrap_or("?"),
            "Selected primary pair"
        );
        Some(to_metrics(pair))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::time::Duration;

    use axum::Json;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;

    use super::*;
    use crate::upstream::{build_http_client, test_server};

    const SAMPLE: &str = r#"{
        "schemaVersion": "1.0.0",
        "pairs": [
            {"chainId": "ethereum", "pairAddress": "0xeth", "priceUsd": "9.0",
             "liquidity": {"usd": 1000000}, "volume": {"h24": 999}, "marketCap": 1},
            {"chainId": "base", "pairAddress": "0xshallow", "priceUsd": "0.5",
             "liquidity": {"usd": 100}, "volume": {"h24": 10}, "marketCap": 500},
            {"chainId": "base", "pairAddress": "0xdeep", "priceUsd": "0.0123",
             "liquidity": {"usd": 5000}, "volume": {"h24": 4321.5}, "fdv": 88000},
            {"chainId": "base", "pairAddress": "0xnoliq", "volume": {"h24": 1}}
        ]
    }"#;

    fn sample_pairs() -> Vec<DexPair> {
        let body: DexTokensBody = serde_json::from_str(SAMPLE).unwrap();
        body.pairs.unwrap()
    }

    fn pair(address: &str, chain: &str, liquidity: Option<f64>) -> DexPair {
        serde_json::from_value(serde_json::json!({
            "chainId": chain,
            "pairAddress": address,
            "liquidity": liquidity.map(|usd| serde_json::json!({"usd": usd})),
        }))
        .unwrap()
    }

    #[test]
    fn selects_deepest_pair_on_chain() {
        let pairs = sample_pairs();
        let best = select_primary_pair(&pairs, "base").unwrap();
        assert_eq!(best.pair_address.as_deref(), Some("0xdeep"));
    }

    #[test]
    fn first_pair_wins_liquidity_tie() {
        let pairs = vec![
            pair("0xfirst", "base", Some(10.0)),
            pair("0xsecond", "base", Some(10.0)),
        ];
        let best = select_primary_pair(&pairs, "base").unwrap();
        assert_eq!(best.pair_address.as_deref(), Some("0xfirst"));
    }

    #[test]
    fn missing_liquidity_counts_as_zero() {
        let pairs = vec![pair("0xnone", "base", None), pair("0xsome", "base", Some(1.0))];
        let best = select_primary_pair(&pairs, "base").unwrap();
        assert_eq!(best.pair_address.as_deref(), Some("0xsome"));
    }

    #[test]
    fn no_pair_on_chain() {
        let pairs = vec![pair("0xeth", "ethereum", Some(1.0))];
        assert!(select_primary_pair(&pairs, "base").is_none());
        assert!(select_primary_pair(&[], "base").is_none());
    }

    #[test]
    fn market_cap_falls_back_to_fdv() {
        let pairs = sample_pairs();
        let m = to_metrics(select_primary_pair(&pairs, "base").unwrap());
        assert_eq!(m.volume24h, 4321.5);
        assert_eq!(m.market_cap, 88000.0);
        assert_eq!(m.price_usd, 0.0123);
        assert_eq!(m.liquidity, 5000.0);
        assert_eq!(m.holders, 0);
    }

    #[test]
    fn bare_pair_maps_to_zeros() {
        let m = to_metrics(&pair("0x", "base", None));
        assert_eq!(m.volume24h, 0.0);
        assert_eq!(m.market_cap, 0.0);
        assert_eq!(m.price_usd, 0.0);
    }

    async fn fake_dex(Path(address): Path<String>) -> axum::response::Response {
        match address.as_str() {
            "0xlisted" => (
                [("content-type", "application/json")],
                SAMPLE,
            )
                .into_response(),
            "0xunlisted" => Json(serde_json::json!({"schemaVersion": "1.0.0", "pairs": null}))
                .into_response(),
            _ => StatusCode::TOO_MANY_REQUESTS.into_response(),
        }
    }

    async fn client() -> DexScreenerMetrics {
        let base = test_server::spawn(
            axum::Router::new().route("/latest/dex/tokens/{address}", get(fake_dex)),
        )
        .await;
        let http = build_http_client(Duration::from_secs(5)).unwrap();
        DexScreenerMetrics::new(http, &format!("{base}/latest/dex"), "base").unwrap()
    }

    #[tokio::test]
    async fn fetch_maps_primary_pair() {
        let m = client().await.fetch("0xlisted").await.unwrap();
        assert_eq!(m.volume24h, 4321.5);
    }

    #[tokio::test]
    async fn null_pairs_is_no_data() {
        assert!(client().await.fetch("0xunlisted").await.is_none());
    }

    #[tokio::test]
    async fn error_status_is_no_data() {
        let c = client().await;
        assert!(matches!(
            c.pairs("0xlimited").await,
            Err(UpstreamError::Status { status: 429 })
        ));
        assert!(c.fetch("0xlimited").await.is_none());
    }
}
