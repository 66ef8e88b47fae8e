use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use super::direction::Direction;

/// Longest upstream error body quoted back to the caller
const MAX_UPSTREAM_BODY_CHARS: usize = 200;

/// Failures raised while serving a translation
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The model server could not be reached (refused, reset, timed out)
    #[error("connection error: {0}")]
    UpstreamUnavailable(String),

    #[error("upstream HTTP error {status}: {body}")]
    UpstreamHttp { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("direction {0} is not served by this instance")]
    DirectionUnavailable(Direction),

    #[error("invalid request body: {0}")]
    InvalidRequest(String),

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl TranslateError {
    /// Stable, machine-readable name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            TranslateError::UpstreamUnavailable(_) => "upstream_unavailable",
            TranslateError::UpstreamHttp { .. } => "upstream_http_error",
            TranslateError::MalformedResponse(_) => "malformed_response",
            TranslateError::DirectionUnavailable(_) => "direction_unavailable",
            TranslateError::InvalidRequest(_) => "invalid_request",
            TranslateError::Unexpected(_) => "unexpected_failure",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            TranslateError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            TranslateError::UpstreamHttp { .. } | TranslateError::MalformedResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            TranslateError::DirectionUnavailable(_) | TranslateError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            TranslateError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the caller; unexpected failures stay generic
    pub fn public_message(&self) -> String {
        match self {
            TranslateError::Unexpected(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }

    /// Build an `UpstreamHttp` error, truncating long bodies
    pub fn upstream_http(status: u16, body: &str) -> Self {
        let body = body.trim();
        let body = match body.char_indices().nth(MAX_UPSTREAM_BODY_CHARS) {
            Some((idx, _)) => format!("{}...", &body[..idx]),
            None => body.to_string(),
        };
        TranslateError::UpstreamHttp { status, body }
    }
}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
            TranslateError::UpstreamUnavailable(err.to_string())
        } else if err.is_decode() {
            TranslateError::MalformedResponse(err.to_string())
        } else {
            TranslateError::Unexpected(err.to_string())
        }
    }
}

impl IntoResponse for TranslateError {
    fn into_response(self) -> Response {
        if let TranslateError::Unexpected(detail) = &self {
            error!("Unexpected translation failure: {}", detail);
        }
        let body = Json(json!({
            "error": self.public_message(),
            "kind": self.kind(),
        }));
        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_kinds_have_distinct_messages() {
        let errors = [
            TranslateError::UpstreamUnavailable("refused".into()),
            TranslateError::upstream_http(500, "boom"),
            TranslateError::MalformedResponse("expected value".into()),
        ];
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert!(messages[0].starts_with("connection error"));
        assert!(messages[1].starts_with("upstream HTTP error 500"));
        assert!(messages[2].starts_with("malformed response"));

        let kinds: std::collections::HashSet<_> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds.len(), 3);
    }

    #[test]
    fn unexpected_failures_are_not_leaked() {
        let err = TranslateError::Unexpected("panicked at src/engine.rs:42".into());
        assert_eq!(err.public_message(), "internal error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn long_upstream_bodies_are_truncated() {
        let body = "错".repeat(500);
        match TranslateError::upstream_http(503, &body) {
            TranslateError::UpstreamHttp { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body.chars().count(), MAX_UPSTREAM_BODY_CHARS + 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn status_codes_by_kind() {
        assert_eq!(
            TranslateError::UpstreamUnavailable(String::new()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            TranslateError::MalformedResponse(String::new()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            TranslateError::DirectionUnavailable(Direction::ZhToEn).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
