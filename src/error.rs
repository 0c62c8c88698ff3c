use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const LIMIT_REACHED_MESSAGE: &str = "Note limit reached. Upgrade to Pro for unlimited notes.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Note limit reached")]
    LimitReached,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    /// True when the store rejected a write because of a unique index.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Database(e) => e
                .as_database_error()
                .and_then(|db_err| db_err.code())
                .map(|code| is_unique_violation_code(&code))
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Replaces a duplicate-key store error with a `Conflict` carrying `message`.
    pub fn on_unique_violation(self, message: &str) -> AppError {
        if self.is_unique_violation() {
            AppError::Conflict(message.to_string())
        } else {
            self
        }
    }
}

// 2067 = SQLite unique constraint, 1555 = SQLite primary key
// 23505 = PostgreSQL unique violation
fn is_unique_violation_code(code: &str) -> bool {
    matches!(code, "2067" | "1555" | "23505")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_unique_violation() {
            return (
                StatusCode::CONFLICT,
                Json(json!({ "error": "Resource already exists (duplicate entry)" }))
            ).into_response();
        }

        let (status, message) = match &self {
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::LimitReached => {
                return (
                    StatusCode::FORBIDDEN,
                    Json(json!({
                        "error": LIMIT_REACHED_MESSAGE,
                        "limitReached": true
                    }))
                ).into_response();
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
