//! Application error types shared by storage, services and HTTP handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Application-level errors. Store and service layers return these directly,
/// so callers match on the variant rather than on a message.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user already exists")]
    UserExists,

    #[error("user not found")]
    UserNotFound,

    #[error("app not found")]
    AppNotFound,

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::UserExists => StatusCode::CONFLICT,
            AppError::UserNotFound | AppError::AppNotFound => StatusCode::NOT_FOUND,
            AppError::Config(_)
            | AppError::Storage(_)
            | AppError::Signing(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to a caller. Technical failures collapse to a
    /// generic text; the detail only goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::InvalidCredentials => "invalid email or password".to_string(),
            AppError::UserExists => "user already exists".to_string(),
            AppError::UserNotFound => "user not found".to_string(),
            AppError::AppNotFound => "app not found".to_string(),
            AppError::Config(_)
            | AppError::Storage(_)
            | AppError::Signing(_)
            | AppError::Internal(_) => "internal error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = Json(json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_caller_categories() {
        assert_eq!(
            AppError::InvalidInput("email is required".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::InvalidCredentials.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::UserExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::AppNotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn technical_errors_hide_detail() {
        let err = AppError::Storage(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "internal error");

        let err = AppError::Signing("InvalidKeyFormat".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "internal error");

        let err = AppError::Internal(anyhow::anyhow!("hash: boom"));
        assert_eq!(err.public_message(), "internal error");
    }

    #[test]
    fn credential_failure_does_not_name_the_field() {
        let msg = AppError::InvalidCredentials.public_message();
        assert_eq!(msg, "invalid email or password");
    }
}
