use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::backend::BackendError;

/// How the browser should surface an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or insufficient credentials; may navigate away.
    Authorization,
    /// Inline message next to the control that triggered the request.
    Validation,
    /// Transient notification; displayed state is left untouched.
    Failure,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("rejected by backend: {0}")]
    Rejected(String),

    #[error("redirect to {location}: {message}")]
    Redirect {
        location: &'static str,
        kind: ErrorKind,
        message: String,
    },

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Maps a backend failure onto the error taxonomy. `fallback` is the
    /// user-facing message for failures that carry no message of their own.
    pub fn from_backend(err: BackendError, fallback: &str) -> Self {
        match err {
            BackendError::Unauthorized => Self::Unauthorized("Authentication required".to_string()),
            BackendError::Forbidden => Self::Forbidden(fallback.to_string()),
            BackendError::NotFound => Self::NotFound(fallback.to_string()),
            BackendError::Rejected { detail, .. } if !detail.trim().is_empty() => {
                Self::Rejected(detail)
            }
            BackendError::Rejected { .. } => Self::Rejected(fallback.to_string()),
            BackendError::Transport(cause) | BackendError::Decode(cause) => {
                tracing::error!(error = %cause, "backend request failed");
                Self::Upstream(fallback.to_string())
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthorized(_) | AppError::Forbidden(_) => ErrorKind::Authorization,
            AppError::Validation(_) | AppError::Rejected(_) => ErrorKind::Validation,
            AppError::Redirect { kind, .. } => *kind,
            AppError::NotFound(_) | AppError::Upstream(_) | AppError::Internal(_) => {
                ErrorKind::Failure
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, message) = match &self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Rejected(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Redirect {
                location, message, ..
            } => {
                let body = Json(json!({
                    "error": message,
                    "kind": kind,
                    "redirect": location,
                }));
                return (StatusCode::SEE_OTHER, [(LOCATION, *location)], body).into_response();
            }
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}
