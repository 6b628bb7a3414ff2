//! Bearer API key authentication.

use arena_core::{Agent, Database};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use tracing::warn;

use crate::error::ApiError;

const BEARER_PREFIX: &str = "Bearer ";

/// Key presented in `Authorization: Bearer <key>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| ApiError::Unauthenticated("Missing or invalid Authorization header".into()))
}

/// Resolve the calling agent from the request headers.
pub fn authenticate<'a>(db: &'a Database, headers: &HeaderMap) -> Result<&'a Agent, ApiError> {
    let key = bearer_token(headers)?;
    db.agent_by_api_key(key).ok_or_else(|| {
        warn!("Rejected unknown API key");
        ApiError::Unauthenticated("Invalid API key".into())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use arena_core::AgentStatus;
    use axum::http::HeaderValue;
    use chrono::Utc;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    fn db() -> Database {
        Database {
            agents: vec![Agent {
                id: "a1".into(),
                name: "Alpha".into(),
                wallet: "0x1".into(),
                fid: None,
                platform: None,
                api_key: "arena_good".into(),
                registered_at: Utc::now(),
                status: AgentStatus::Registered,
            }],
            ..Database::default()
        }
    }

    #[test]
    fn missing_header_is_unauthenticated() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(ApiError::Unauthenticated(_))
        ));
    }

    #[test]
    fn non_bearer_scheme_is_unauthenticated() {
        assert!(matches!(
            bearer_token(&headers("Basic YWxhZGRpbjpvcGVu")),
            Err(ApiError::Unauthenticated(_))
        ));
    }

    #[test]
    fn known_key_resolves_agent() {
        let db = db();
        let agent = authenticate(&db, &headers("Bearer arena_good")).unwrap();
        assert_eq!(agent.id, "a1");
    }

    #[test]
    fn unknown_key_is_unauthenticated() {
        let db = db();
        assert!(matches!(
            authenticate(&db, &headers("Bearer arena_bad")),
            Err(ApiError::Unauthenticated(_))
        ));
    }
}
