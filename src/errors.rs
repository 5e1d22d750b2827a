use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("This time slot is fully booked. Please choose another time.")]
    SlotFull,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No token provided")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Appointment not found")]
    NotFound,

    #[error("Too many requests, please try again later.")]
    RateLimited,

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::SlotFull => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            // Missing and invalid credentials deny with distinct statuses
            AppError::MissingToken => StatusCode::FORBIDDEN,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            AppError::Validation(errors) => {
                serde_json::json!({ "success": false, "errors": errors })
            }
            // Persistence detail stays in the server log
            AppError::Database(e) => {
                tracing::error!("database error: {e}");
                serde_json::json!({ "success": false, "message": "Something went wrong" })
            }
            AppError::Internal(e) => {
                tracing::error!("internal error: {e}");
                serde_json::json!({ "success": false, "message": "Something went wrong" })
            }
            other => serde_json::json!({ "success": false, "message": other.to_string() }),
        };

        (status, axum::Json(body)).into_response()
    }
}
