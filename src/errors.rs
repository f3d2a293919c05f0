use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use crate::services::organizer_service::OrganizerError;
use serde_json::json;
use std::fmt;

/// A lightweight wrapper for general errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError with a specific status and message.
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Shortcut for 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
            "status": self.status.as_u16()
        }));

        (self.status, body).into_response()
    }
}

/// Returned for storage failures; the detail stays in the logs.
const STORAGE_FAILURE_MESSAGE: &str = "internal storage error";

impl From<OrganizerError> for AppError {
    fn from(err: OrganizerError) -> Self {
        match err {
            OrganizerError::Configuration(_) => {
                tracing::error!(error = %err, "request failed on missing configuration");
                AppError::internal(err.to_string())
            }
            OrganizerError::Storage(_) => {
                tracing::error!(error = %err, "storage failure");
                AppError::internal(STORAGE_FAILURE_MESSAGE)
            }
        }
    }
}
