//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::logic::evidence::EvidenceError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Validation errors
    ValidationError(String),

    // Evidence write errors
    PersistenceError(String),

    // External service errors
    DispatchError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PersistenceError(msg) => {
                tracing::error!("Persistence error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::DispatchError(msg) => {
                tracing::error!("Dispatch error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(json!({
            "status": "error",
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::ValidationError(err.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(crate::models::validation_message(&err))
    }
}

impl From<EvidenceError> for AppError {
    fn from(err: EvidenceError) -> Self {
        match err {
            EvidenceError::Validation(msg) => AppError::ValidationError(msg),
            EvidenceError::InvalidImage(e) => AppError::ValidationError(format!("Invalid image: {}", e)),
            EvidenceError::Persistence(e) => AppError::PersistenceError(format!("Failed to store evidence: {}", e)),
            EvidenceError::Dispatch(e) => AppError::DispatchError(format!("Failed to send alert: {}", e)),
        }
    }
}
