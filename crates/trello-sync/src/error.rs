//! Error types for Trello sync.

use axum::http::StatusCode;
use thiserror::Error;

/// Longest upstream error body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors from the Trello REST API.
#[derive(Debug, Error)]
pub enum TrelloError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("Trello API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Client is missing credentials or board
    #[error("Trello not configured: {0}")]
    NotConfigured(String),
}

/// Errors from the task store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Task does not exist
    #[error("Task not found: {0}")]
    NotFound(String),

    /// Store returned an error response
    #[error("Task store error {status}: {message}")]
    Api { status: u16, message: String },

    /// Store location is not configured
    #[error("Task store not configured: {0}")]
    NotConfigured(String),
}

/// Errors surfaced by a sync operation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Request did not carry a usable task
    #[error("Invalid task data")]
    InvalidTask,

    /// No board list matches the task's status
    #[error("Target Trello list not found")]
    ListNotFound { list_name: String },

    /// Trello call failed
    #[error(transparent)]
    Trello(#[from] TrelloError),

    /// Task store call failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SyncError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidTask | Self::ListNotFound { .. } => StatusCode::BAD_REQUEST,
            Self::Trello(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Short, non-empty description of an upstream error response.
///
/// Empty and markup bodies (proxy error pages) are replaced by the status
/// reason phrase; long bodies are cut at [`MAX_ERROR_BODY_CHARS`].
pub(crate) fn summarize_body(status: reqwest::StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() || body.starts_with('<') {
        return status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string();
    }
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let truncated: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_bad_request() {
        assert_eq!(SyncError::InvalidTask.status_code(), StatusCode::BAD_REQUEST);
        let err = SyncError::ListNotFound {
            list_name: "Doing".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Target Trello list not found");
    }

    #[test]
    fn test_downstream_errors_are_server_errors() {
        let err = SyncError::from(TrelloError::Api {
            status: 401,
            message: "invalid token".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Trello API error 401: invalid token");

        let err = SyncError::from(StoreError::NotFound("t-9".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_summarize_body_keeps_short_text() {
        let status = reqwest::StatusCode::UNAUTHORIZED;
        assert_eq!(summarize_body(status, "  invalid token\n"), "invalid token");
    }

    #[test]
    fn test_summarize_body_replaces_empty_and_markup() {
        let status = reqwest::StatusCode::BAD_GATEWAY;
        assert_eq!(summarize_body(status, ""), "Bad Gateway");
        assert_eq!(
            summarize_body(status, "<html><body><h1>502 Bad Gateway</h1></body></html>"),
            "Bad Gateway"
        );
    }

    #[test]
    fn test_summarize_body_truncates_long_text() {
        let body = "é".repeat(MAX_ERROR_BODY_CHARS + 50);
        let summary = summarize_body(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body);
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), MAX_ERROR_BODY_CHARS + 3);
    }
}
