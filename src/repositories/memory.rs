//! In-memory credential store. Same error semantics as the SQLite backend.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{AppProvider, UserProvider, UserSaver};
use crate::error::{AppError, AppResult};
use crate::models::{App, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    by_email: HashMap<String, usize>,
    apps: HashMap<i32, App>,
}

/// Users and apps kept in process memory behind a mutex. Ids start at 1.
#[derive(Default)]
pub struct MemoryStorage {
    tables: Mutex<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("memory storage lock poisoned")))
    }

    /// Register an application. An existing id is replaced.
    pub fn insert_app(&self, app: App) -> AppResult<()> {
        self.lock()?.apps.insert(app.id, app);
        Ok(())
    }

    pub fn user_count(&self) -> AppResult<usize> {
        Ok(self.lock()?.users.len())
    }
}

#[async_trait]
impl UserSaver for MemoryStorage {
    async fn save_user(&self, email: &str, pass_hash: &str) -> AppResult<i64> {
        let mut tables = self.lock()?;
        if tables.by_email.contains_key(email) {
            return Err(AppError::UserExists);
        }
        let id = tables.users.len() as i64 + 1;
        tables.users.push(User {
            id,
            email: email.to_string(),
            pass_hash: pass_hash.to_string(),
        });
        let index = tables.users.len() - 1;
        tables.by_email.insert(email.to_string(), index);
        Ok(id)
    }
}

#[async_trait]
impl UserProvider for MemoryStorage {
    async fn user(&self, email: &str) -> AppResult<User> {
        let tables = self.lock()?;
        tables
            .by_email
            .get(email)
            .map(|&i| tables.users[i].clone())
            .ok_or(AppError::UserNotFound)
    }

    async fn is_admin(&self, _user_id: i64) -> AppResult<bool> {
        Ok(false)
    }
}

#[async_trait]
impl AppProvider for MemoryStorage {
    async fn app(&self, id: i32) -> AppResult<App> {
        self.lock()?
            .apps
            .get(&id)
            .cloned()
            .ok_or(AppError::AppNotFound)
    }
}
