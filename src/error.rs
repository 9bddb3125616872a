//! Error types for the study-rag system

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the study-rag system
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Session id was never created or has been deleted
    #[error("Session {0} not found")]
    SessionNotFound(Uuid),

    /// Operation requires a Ready session
    #[error("Session {0} is not ready")]
    NotReady(Uuid),

    /// State machine misuse: terminal sessions cannot transition again
    #[error("Invalid transition for session {id}: {from} -> {to}")]
    InvalidTransition {
        id: Uuid,
        from: &'static str,
        to: &'static str,
    },

    /// Document index construction failed
    #[error("Indexing failed: {0}")]
    Indexing(String),

    /// Generative backend call failed
    #[error("Backend error: {0}")]
    Backend(String),

    /// Generative backend call exceeded its deadline
    #[error("Backend request timed out")]
    BackendTimeout,

    /// Malformed client request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Structured error body returned to HTTP clients
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl Error {
    /// Stable machine-readable code for the HTTP body
    fn code(&self) -> &'static str {
        match self {
            Error::SessionNotFound(_) => "session_not_found",
            Error::NotReady(_) => "not_ready",
            Error::InvalidTransition { .. } => "invalid_transition",
            Error::Indexing(_) => "indexing_error",
            Error::Backend(_) => "backend_error",
            Error::BackendTimeout => "backend_timeout",
            Error::InvalidRequest(_) => "invalid_request",
            Error::Config(_) => "config_error",
            Error::Io(_) => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Error::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Error::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::Backend(_) => StatusCode::BAD_GATEWAY,
            Error::BackendTimeout => StatusCode::GATEWAY_TIMEOUT,
            Error::InvalidTransition { .. }
            | Error::Indexing(_)
            | Error::Config(_)
            | Error::Io(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
        }
        let body = ErrorBody {
            error: self.to_string(),
            code: self.code(),
        };
        (status, Json(body)).into_response()
    }
}
