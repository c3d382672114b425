//! SQLite credential store: users and apps.

use async_trait::async_trait;
use tracing::debug;

use super::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{App, User};
use crate::repositories::{AppProvider, UserProvider, UserSaver};

/// Credential store over a shared SQLite pool. Cheap to clone.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: DbPool,
}

impl SqliteStorage {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Register a client application and return its id.
    pub async fn save_app(&self, name: &str, secret: &str) -> AppResult<i32> {
        let row: (i32,) = sqlx::query_as("INSERT INTO apps (name, secret) VALUES (?, ?) RETURNING id")
            .bind(name)
            .bind(secret)
            .fetch_one(&self.pool)
            .await?;
        debug!(app_id = row.0, name = %name, "app saved");
        Ok(row.0)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl UserSaver for SqliteStorage {
    async fn save_user(&self, email: &str, pass_hash: &str) -> AppResult<i64> {
        // Uniqueness is left to the constraint; a SELECT first would race.
        let result = sqlx::query("INSERT INTO users (email, pass_hash) VALUES (?, ?)")
            .bind(email)
            .bind(pass_hash)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::UserExists),
            Err(e) => Err(AppError::Storage(e)),
        }
    }
}

#[async_trait]
impl UserProvider for SqliteStorage {
    async fn user(&self, email: &str) -> AppResult<User> {
        let row = sqlx::query_as::<_, User>("SELECT id, email, pass_hash FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(AppError::UserNotFound)
    }

    async fn is_admin(&self, _user_id: i64) -> AppResult<bool> {
        // No admin table in the schema.
        Ok(false)
    }
}

#[async_trait]
impl AppProvider for SqliteStorage {
    async fn app(&self, id: i32) -> AppResult<App> {
        let row = sqlx::query_as::<_, App>("SELECT id, name, secret FROM apps WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or(AppError::AppNotFound)
    }
}
