use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errors a handler can answer with. Each variant maps to one status code and a
/// `{"error": ...}` body.
#[derive(Debug)]
pub enum AppError {
    /// A required field is missing or malformed.
    Input(&'static str),
    /// The record already exists.
    Conflict(&'static str),
    /// Unknown resource, or a file the caller may not read.
    NotFound(&'static str),
    /// Credentials did not match.
    Unauthorized(&'static str),
    /// The store rejected a write; the message is passed through to the caller.
    Store(String),
    /// Anything else. Details are logged, not returned.
    Internal(&'static str),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Input(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::Input(m)
            | AppError::Conflict(m)
            | AppError::NotFound(m)
            | AppError::Unauthorized(m)
            | AppError::Internal(m) => *m,
            AppError::Store(m) => m.as_str(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

pub trait ResultExt<T> {
    /// Log the error and answer with a generic 500.
    fn reject(self, message: &'static str) -> Result<T, AppError>;

    /// Log the error and answer with a 500 that carries `<prefix>: <error>`.
    fn reject_store(self, prefix: &str) -> Result<T, AppError>;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    fn reject(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{message}: {e}");
            AppError::Internal(message)
        })
    }

    fn reject_store(self, prefix: &str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{prefix}: {e}");
            AppError::Store(format!("{prefix}: {e}"))
        })
    }
}
