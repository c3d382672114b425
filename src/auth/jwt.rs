//! JWT issue and validation. Every token is signed with the secret of the
//! application it was issued for.

use crate::error::{AppError, AppResult};
use crate::models::{App, User};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub uid: i64,
    pub email: String,
    pub app_id: i32,
    pub exp: i64,
}

/// Builds HS256 session tokens. Holds no keys of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenIssuer;

impl TokenIssuer {
    pub fn new() -> Self {
        Self
    }

    pub fn issue(&self, user: &User, app: &App, ttl: Duration) -> AppResult<String> {
        self.issue_at(user, app, ttl, Utc::now())
    }

    /// Issue with an explicit issuance time. Identical inputs give identical tokens.
    pub fn issue_at(
        &self,
        user: &User,
        app: &App,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        let secret = app.secret();
        if secret.is_empty() {
            return Err(AppError::Signing(format!("app {} has an empty secret", app.id)));
        }

        let ttl = chrono::Duration::from_std(ttl).map_err(|e| AppError::Signing(e.to_string()))?;
        let claims = Claims {
            uid: user.id,
            email: user.email.clone(),
            app_id: app.id,
            exp: (now + ttl).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::Signing(e.to_string()))?;
        Ok(token)
    }

    /// Verify signature and expiry against `app`'s secret.
    pub fn decode(&self, token: &str, app: &App) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(app.secret().as_bytes()),
            &validation,
        )
        .map_err(|e| AppError::InvalidInput(format!("invalid token: {}", e)))?;
        Ok(data.claims)
    }
}
