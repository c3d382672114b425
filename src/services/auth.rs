//! Login, registration and admin checks on top of the credential store.

use crate::auth::{PasswordHasher, TokenIssuer};
use crate::error::{AppError, AppResult};
use crate::repositories::{AppProvider, UserProvider, UserSaver};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Stateless apart from its collaborators; clone it freely across requests.
#[derive(Clone)]
pub struct AuthService {
    user_saver: Arc<dyn UserSaver>,
    user_provider: Arc<dyn UserProvider>,
    app_provider: Arc<dyn AppProvider>,
    tokens: TokenIssuer,
    passwords: PasswordHasher,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(
        user_saver: Arc<dyn UserSaver>,
        user_provider: Arc<dyn UserProvider>,
        app_provider: Arc<dyn AppProvider>,
        passwords: PasswordHasher,
        token_ttl: Duration,
    ) -> Self {
        Self {
            user_saver,
            user_provider,
            app_provider,
            tokens: TokenIssuer::new(),
            passwords,
            token_ttl,
        }
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Check credentials and issue a token for `app_id`.
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    #[instrument(name = "auth.login", skip(self, password))]
    pub async fn login(&self, email: &str, password: &str, app_id: i32) -> AppResult<String> {
        info!("attempting to login user");

        let user = match self.user_provider.user(email).await {
            Ok(user) => user,
            Err(AppError::UserNotFound) => {
                warn!("user not found");
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => {
                error!(error = %e, "failed to get user");
                return Err(e);
            }
        };

        if !self
            .passwords
            .verify(password.to_string(), user.pass_hash.clone())
            .await?
        {
            info!("invalid credentials");
            return Err(AppError::InvalidCredentials);
        }

        let app = self.app_provider.app(app_id).await?;

        let token = self
            .tokens
            .issue(&user, &app, self.token_ttl)
            .inspect_err(|e| error!(error = %e, "failed to generate token"))?;

        info!(user_id = user.id, "user logged in successfully");
        Ok(token)
    }

    /// Hash `password` and store a new user. Returns the new user id.
    #[instrument(name = "auth.register", skip(self, password))]
    pub async fn register_new_user(&self, email: &str, password: &str) -> AppResult<i64> {
        info!("registering user");

        let pass_hash = self
            .passwords
            .hash(password.to_string())
            .await
            .inspect_err(|e| error!(error = %e, "failed to generate password hash"))?;

        match self.user_saver.save_user(email, &pass_hash).await {
            Ok(id) => {
                info!(user_id = id, "user registered");
                Ok(id)
            }
            Err(AppError::UserExists) => {
                warn!("user already exists");
                Err(AppError::UserExists)
            }
            Err(e) => {
                error!(error = %e, "failed to save user");
                Err(e)
            }
        }
    }

    /// Re-queried on every call; store failures are returned, never read as `false`.
    #[instrument(name = "auth.is_admin", skip(self))]
    pub async fn is_admin(&self, user_id: i64) -> AppResult<bool> {
        info!("checking if user is admin");

        let is_admin = self.user_provider.is_admin(user_id).await?;

        info!(is_admin, "checked if user is admin");
        Ok(is_admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{App, User};
    use crate::repositories::MemoryStorage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(3600);

    fn service_with(store: Arc<MemoryStorage>) -> AuthService {
        AuthService::new(
            store.clone(),
            store.clone(),
            store,
            PasswordHasher::default(),
            TTL,
        )
    }

    fn seeded_store() -> Arc<MemoryStorage> {
        let store = Arc::new(MemoryStorage::new());
        store.insert_app(App::new(1, "test", "test-secret")).unwrap();
        store
    }

    #[tokio::test]
    async fn register_then_login_issues_token_for_user() {
        let store = seeded_store();
        let service = service_with(store.clone());

        let id = service.register_new_user("a@x.com", "p@ss1").await.unwrap();
        assert_eq!(id, 1);

        let token = service.login("a@x.com", "p@ss1", 1).await.unwrap();
        let app = App::new(1, "test", "test-secret");
        let claims = TokenIssuer::new().decode(&token, &app).unwrap();
        assert_eq!(claims.uid, 1);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.app_id, 1);
        let expected = chrono::Utc::now().timestamp() + TTL.as_secs() as i64;
        assert!((claims.exp - expected).abs() <= 2);
    }

    #[tokio::test]
    async fn stored_hash_is_not_the_password() {
        let store = seeded_store();
        let service = service_with(store.clone());
        service.register_new_user("a@x.com", "p@ss1").await.unwrap();

        let user = store.user("a@x.com").await.unwrap();
        assert_ne!(user.pass_hash, "p@ss1");
        assert!(user.pass_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let service = service_with(seeded_store());
        service.register_new_user("a@x.com", "p@ss1").await.unwrap();

        let wrong_pass = service.login("a@x.com", "nope", 1).await.unwrap_err();
        let unknown = service.login("ghost@x.com", "p@ss1", 1).await.unwrap_err();
        assert!(matches!(wrong_pass, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert_eq!(wrong_pass.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn unknown_app_is_reported_as_such() {
        let service = service_with(seeded_store());
        service.register_new_user("a@x.com", "p@ss1").await.unwrap();

        let err = service.login("a@x.com", "p@ss1", 99).await.unwrap_err();
        assert!(matches!(err, AppError::AppNotFound));
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let store = seeded_store();
        let service = service_with(store.clone());
        service.register_new_user("a@x.com", "p@ss1").await.unwrap();

        let err = service.register_new_user("a@x.com", "other").await.unwrap_err();
        assert!(matches!(err, AppError::UserExists));
        assert_eq!(store.user_count().unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registrations_of_one_email_create_one_user() {
        let store = seeded_store();
        let service = service_with(store.clone());

        let attempts = (0..8).map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .register_new_user("race@x.com", &format!("pass-{}", i))
                    .await
            })
        });
        let results: Vec<_> = futures::future::join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let ok = results.iter().filter(|r| r.is_ok()).count();
        let exists = results
            .iter()
            .filter(|r| matches!(r, Err(AppError::UserExists)))
            .count();
        assert_eq!(ok, 1);
        assert_eq!(exists, 7);
        assert_eq!(store.user_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn is_admin_is_false_by_default() {
        let service = service_with(seeded_store());
        let id = service.register_new_user("a@x.com", "p@ss1").await.unwrap();
        assert!(!service.is_admin(id).await.unwrap());
    }

    /// Store double that only answers reads and counts admin lookups.
    struct FlakyAdminStore {
        admin_calls: AtomicUsize,
    }

    #[async_trait]
    impl UserProvider for FlakyAdminStore {
        async fn user(&self, _email: &str) -> AppResult<User> {
            Err(AppError::Storage(sqlx::Error::PoolTimedOut))
        }

        async fn is_admin(&self, _user_id: i64) -> AppResult<bool> {
            self.admin_calls.fetch_add(1, Ordering::SeqCst);
            Err(AppError::Storage(sqlx::Error::PoolClosed))
        }
    }

    #[tokio::test]
    async fn store_failures_propagate_instead_of_false() {
        let memory = seeded_store();
        let flaky = Arc::new(FlakyAdminStore {
            admin_calls: AtomicUsize::new(0),
        });
        let service = AuthService::new(
            memory.clone(),
            flaky.clone(),
            memory,
            PasswordHasher::default(),
            TTL,
        );

        assert!(matches!(service.is_admin(1).await, Err(AppError::Storage(_))));
        assert!(matches!(service.is_admin(1).await, Err(AppError::Storage(_))));
        assert_eq!(flaky.admin_calls.load(Ordering::SeqCst), 2);

        // Lookup failures other than "not found" are not disguised as bad credentials.
        let err = service.login("a@x.com", "p@ss1", 1).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
