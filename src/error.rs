use std::time::Duration;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to start summarizer `{program}`: {source}")]
    ProcessSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("summarizer exited with {}", exit_label(.exit_code))]
    BackendFailure {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Never surfaced to callers; `extract` degrades it to `structured: None`.
    #[error("summary is not a structured record: {0}")]
    ParseAmbiguity(String),

    #[error("summarizer did not finish within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("internal error: {0}")]
    Internal(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

impl SearchError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SearchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SearchError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            SearchError::ProcessSpawn { .. }
            | SearchError::BackendFailure { .. }
            | SearchError::ParseAmbiguity(_)
            | SearchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            SearchError::InvalidInput(message) => json!({ "error": message }),
            SearchError::BackendFailure { stderr, .. } => {
                tracing::error!("backend script error: {}", stderr);
                json!({ "error": "Backend script failed", "details": stderr })
            }
            SearchError::ProcessSpawn { .. } => {
                tracing::error!("{:#}", self);
                json!({ "error": "Failed to start summarizer" })
            }
            SearchError::Timeout(_) => {
                tracing::error!("{}", self);
                json!({ "error": self.to_string() })
            }
            SearchError::ParseAmbiguity(_) | SearchError::Internal(_) => {
                tracing::error!("api route error: {}", self);
                json!({ "error": "Internal server error" })
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            SearchError::InvalidInput("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SearchError::BackendFailure {
                exit_code: Some(1),
                stderr: String::new()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            SearchError::Timeout(Duration::from_secs(5)).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }

    #[test]
    fn test_backend_failure_message() {
        let signalled = SearchError::BackendFailure {
            exit_code: None,
            stderr: String::new(),
        };
        assert_eq!(
            signalled.to_string(),
            "summarizer exited with no status (terminated by signal)"
        );
    }
}
