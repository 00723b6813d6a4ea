//! Server error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mlv_content::ContentError;
use mlv_progress::ProgressError;
use mlv_site::ResolveError;
use serde_json::json;

/// Errors surfaced by request handlers.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Nothing is served at the given path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request body or query is unusable.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Reading lesson content failed.
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    /// Persisting progress failed.
    #[error("Progress error: {0}")]
    Progress(#[from] ProgressError),

    /// Encoding a response body failed.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ResolveError> for ServerError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound(path) => Self::NotFound(path),
            ResolveError::Content(e) if e.is_not_found() => {
                Self::NotFound(e.path.map(|p| p.display().to_string()).unwrap_or_default())
            }
            ResolveError::Content(e) => Self::Content(e),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::NotFound(path) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Not found", "path": path}),
            ),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({"error": message})),
            Self::Content(e) => {
                tracing::error!(error = %e, "Content read failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": e.to_string()}),
                )
            }
            Self::Progress(e) => {
                tracing::error!(error = %e, "Progress write failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": e.to_string()}),
                )
            }
            Self::Json(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": e.to_string()}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
