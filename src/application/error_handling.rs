// src/application/error_handling.rs
//
// Error handling for HTTP handlers
//
// ARCHITECTURE:
// - Maps internal errors → client-facing responses
// - Provides a consistent JSON error body
// - Never exposes SQL or file paths to clients
// - Logs the full error server-side

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Standard error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Invalid configuration or input (400)
    Validation,

    /// Database/persistence error (500)
    Database,

    /// No pooled connection available (503)
    Unavailable,

    /// File system error (500)
    FileSystem,

    /// Other/unknown error (500)
    Internal,
}

impl ErrorType {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorType::Validation => StatusCode::BAD_REQUEST,
            ErrorType::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorType::Database | ErrorType::FileSystem | ErrorType::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ErrorResponse {
    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::Config(message) => Self::validation(message),

            AppError::Database(db_error) => {
                log::error!("Database error: {:?}", db_error);
                Self::failure(ErrorType::Database, "Database operation failed", Some("Check logs for details"))
            }

            AppError::Pool(pool_error) => {
                log::error!("Connection pool error: {}", pool_error);
                Self::failure(ErrorType::Unavailable, "Database connection unavailable", None)
            }

            AppError::Serialization(serde_error) => {
                log::error!("Serialization error: {:?}", serde_error);
                Self::failure(ErrorType::Internal, "Data serialization failed", None)
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {:?}", io_error);
                Self::failure(ErrorType::FileSystem, "File system operation failed", None)
            }

            AppError::Other(message) => {
                log::error!("Other error: {}", message);
                Self::failure(ErrorType::Internal, &message, None)
            }
        }
    }

    fn failure(error_type: ErrorType, message: &str, details: Option<&str>) -> Self {
        Self {
            success: false,
            error_type,
            message: message.to_string(),
            details: details.map(str::to_string),
        }
    }

    pub fn validation(message: String) -> Self {
        Self {
            success: false,
            error_type: ErrorType::Validation,
            message,
            details: None,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.error_type.status_code(), Json(self)).into_response()
    }
}

/// Handler error wrapper so handlers can use `?` on `AppResult`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        ErrorResponse::from_app_error(self.0).into_response()
    }
}
