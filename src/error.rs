use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The primary engine failed in transport, status or schema validation.
    /// The orchestrator recovers from this by switching engines.
    #[error("Analysis engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("External API error: {0}")]
    ExternalApi(String),
}

impl AppError {
    /// Collapses any upstream failure into `EngineUnavailable` so callers can
    /// match on a single variant when deciding whether to fall back.
    pub fn into_engine_unavailable(self) -> Self {
        match self {
            AppError::EngineUnavailable(_) => self,
            other => AppError::EngineUnavailable(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::EngineUnavailable(_) | AppError::HttpClient(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_engine_unavailable_wraps_message() {
        let err = AppError::ExternalApi("status 503".to_string()).into_engine_unavailable();
        match err {
            AppError::EngineUnavailable(msg) => assert!(msg.contains("status 503")),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_into_engine_unavailable_is_idempotent() {
        let err = AppError::EngineUnavailable("schema".to_string()).into_engine_unavailable();
        assert_eq!(err.to_string(), "Analysis engine unavailable: schema");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InvalidInput("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::EngineUnavailable("x".into())
                .into_response()
                .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::ExternalApi("x".into()).into_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
