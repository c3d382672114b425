//! Auth HTTP handlers: login, register, is_admin.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::http::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[serde(default)]
    #[validate(range(min = 1, message = "app_id is required"))]
    pub app_id: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct IsAdminRequest {
    #[serde(default)]
    #[validate(range(min = 1, message = "user_id is required"))]
    pub user_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IsAdminResponse {
    pub is_admin: bool,
}

/// Unwrap and validate a JSON body. Both a malformed body and a failed
/// precondition are caller errors.
fn validated<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    body.validate()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    Ok(body)
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let body = validated(payload)?;
    let token = state
        .auth_service()
        .login(&body.email, &body.password, body.app_id)
        .await?;
    Ok(Json(LoginResponse { token }))
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, AppError> {
    let body = validated(payload)?;
    let user_id = state
        .auth_service()
        .register_new_user(&body.email, &body.password)
        .await?;
    Ok(Json(RegisterResponse { user_id }))
}

/// POST /auth/is_admin
pub async fn is_admin(
    State(state): State<AppState>,
    payload: Result<Json<IsAdminRequest>, JsonRejection>,
) -> Result<Json<IsAdminResponse>, AppError> {
    let body = validated(payload)?;
    let is_admin = state.auth_service().is_admin(body.user_id).await?;
    Ok(Json(IsAdminResponse { is_admin }))
}
