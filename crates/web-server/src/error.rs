use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] database::DbError),
    #[error("Invalid submission: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
    #[error("Invalid input: {0}")]
    Input(#[from] core_types::CoreError),
    #[error("Export failed: {0}")]
    Export(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Authentication required")]
    Unauthorized,
    #[error("Session error: {0}")]
    Session(String),
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Export(err.to_string())
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(database::DbError::NotFound) => {
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            AppError::Database(database::DbError::Conflict(name)) => {
                (StatusCode::CONFLICT, format!("'{}' already exists", name))
            }
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::Analytics(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Input(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Export(message) => {
                tracing::error!(error = %message, "Export error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to build the export".to_string(),
                )
            }
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Authentication required".to_string())
            }
            AppError::Session(message) => {
                tracing::error!(error = %message, "Session error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to open a session".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
