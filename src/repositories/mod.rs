//! Credential store contract: one trait per capability, so a backend (or a
//! test double) only implements what its caller needs.

mod memory;

pub use memory::MemoryStorage;

use crate::error::AppResult;
use crate::models::{App, User};
use async_trait::async_trait;

#[async_trait]
pub trait UserSaver: Send + Sync {
    /// Insert a user and return its store-assigned id.
    /// `AppError::UserExists` when the email is already taken.
    async fn save_user(&self, email: &str, pass_hash: &str) -> AppResult<i64>;
}

#[async_trait]
pub trait UserProvider: Send + Sync {
    /// `AppError::UserNotFound` when no user has this email.
    async fn user(&self, email: &str) -> AppResult<User>;

    /// Administrative flag for `user_id`. There is no admin table yet, so the
    /// shipped backends answer `false` for everyone; a privilege table would
    /// plug in here.
    async fn is_admin(&self, user_id: i64) -> AppResult<bool>;
}

#[async_trait]
pub trait AppProvider: Send + Sync {
    /// `AppError::AppNotFound` when no app has this id.
    async fn app(&self, id: i32) -> AppResult<App>;
}
