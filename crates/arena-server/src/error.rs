//! API error taxonomy and its HTTP mapping.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::error;

/// Id of the record a conflicting request collided with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictRef {
    /// JSON key the id is reported under, e.g. `agentId`.
    pub field: &'static str,
    pub id: String,
}

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// The registry has no record of the token.
    #[error("{0}")]
    TokenNotLaunched(String),

    /// Submission window closed.
    #[error("{0}")]
    CompetitionEnded(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation; carries the existing record when known.
    #[error("{message}")]
    Conflict {
        message: String,
        existing: Option<ConflictRef>,
    },

    /// Anything unanticipated. The detail is logged, never returned.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn conflict(
        message: impl Into<String>,
        field: &'static str,
        id: impl Into<String>,
    ) -> Self {
        Self::Conflict {
            message: message.into(),
            existing: Some(ConflictRef {
                field,
                id: id.into(),
            }),
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::TokenNotLaunched(_) | Self::CompetitionEnded(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<arena_core::Error> for ApiError {
    fn from(e: arena_core::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = Map::new();
        match self {
            Self::Internal(detail) => {
                error!(error = %detail, "Request failed");
                body.insert("error".into(), Value::from("Internal server error"));
            }
            Self::Conflict { message, existing } => {
                body.insert("error".into(), Value::from(message));
                if let Some(existing) = existing {
                    body.insert(existing.field.into(), Value::from(existing.id));
                }
            }
            other => {
                body.insert("error".into(), Value::from(other.to_string()));
            }
        }
        (status, Json(Value::Object(body))).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn conflict_carries_existing_id() {
        let (status, body) =
            body_of(ApiError::conflict("Wallet already registered", "agentId", "abc")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Wallet already registered");
        assert_eq!(body["agentId"], "abc");
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() {
        let (status, body) = body_of(ApiError::Internal("disk on fire at /srv".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(!body.to_string().contains("/srv"));
    }

    #[test]
    fn business_rejections_are_bad_request() {
        assert_eq!(
            ApiError::TokenNotLaunched("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::CompetitionEnded("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthenticated("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
    }
}
