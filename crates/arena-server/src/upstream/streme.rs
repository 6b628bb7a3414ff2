//! Streme launch registry client.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};

use super::types::{LaunchedToken, StremeTokenBody};
use super::{TokenVerifier, UpstreamError, normalize_base_url};

/// Looks tokens up in the Streme registry by address.
#[derive(Debug, Clone)]
pub struct StremeVerifier {
    http: reqwest::Client,
    base_url: String,
}

impl StremeVerifier {
    pub fn new(http: reqwest::Client, base_url: &str) -> Result<Self, UpstreamError> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub(crate) fn token_url(&self, token_address: &str) -> String {
        format!("{}/tokens/{token_address}", self.base_url)
    }

    /// `Ok(None)` is a true negative (registry answered 404).
    pub async fn lookup(
        &self,
        token_address: &str,
    ) -> Result<Option<LaunchedToken>, UpstreamError> {
        let resp = self.http.get(self.token_url(token_address)).send().await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }
        let body: StremeTokenBody = resp.json().await?;
        Ok(Some(map_token(token_address, body)))
    }
}

fn value_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn map_token(requested: &str, body: StremeTokenBody) -> LaunchedToken {
    LaunchedToken {
        address: body.address.unwrap_or_else(|| requested.to_string()),
        name: body.name.unwrap_or_default(),
        symbol: body.symbol.unwrap_or_default(),
        deployer: body.deployer.or(body.creator),
        created_at: body
            .created_at_camel
            .and_then(value_to_string)
            .or_else(|| body.created_at.and_then(value_to_string)),
        image: body.image,
    }
}

#[async_trait]
impl TokenVerifier for StremeVerifier {
    async fn verify(&self, token_address: &str) -> Option<LaunchedToken> {
        match self.lookup(token_address).await {
            Ok(Some(token)) => {
                debug!(token = %token_address, symbol = %token.symbol, "Token found on Streme");
                Some(token)
            }
            Ok(None) => {
                debug!(token = %token_address, "Token not launched via Streme");
                None
            }
            Err(e) => {
                warn!(
                    token = %token_address,
                    error = %e,
                    "Streme lookup failed; treating as unverified"
                );
                None
            }
        }
    }
}
