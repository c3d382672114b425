//! Password hashing and verification (argon2id, random salt per hash).

use crate::error::{AppError, AppResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

/// Hashes with one fixed cost for every user. Hashing is CPU-bound, so the
/// async methods move it onto the blocking pool.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// `time_cost` is the argon2 iteration count.
    pub fn new(time_cost: u32) -> AppResult<Self> {
        let params = Params::new(Params::DEFAULT_M_COST, time_cost, Params::DEFAULT_P_COST, None)
            .map_err(|e| AppError::Config(format!("argon2 params: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash_blocking(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hash: {}", e)))?
            .to_string();
        Ok(hash)
    }

    /// `Ok(false)` on mismatch; `Err` only when `hash` is not a valid PHC string.
    pub fn verify_blocking(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| AppError::Internal(anyhow::anyhow!("parse hash: {}", e)))?;
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    pub async fn hash(&self, password: String) -> AppResult<String> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash_blocking(&password))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hash task: {}", e)))?
    }

    pub async fn verify(&self, password: String, hash: String) -> AppResult<bool> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify_blocking(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("verify task: {}", e)))?
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() {
        let hasher = PasswordHasher::default();
        let hash = hasher.hash_blocking("mypassword").unwrap();
        assert!(hasher.verify_blocking("mypassword", &hash).unwrap());
        assert!(!hasher.verify_blocking("wrong", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_different_salts() {
        let hasher = PasswordHasher::default();
        let a = hasher.hash_blocking("p@ss1").unwrap();
        let b = hasher.hash_blocking("p@ss1").unwrap();
        assert_ne!(a, b);
        assert!(!a.contains("p@ss1"));
    }

    #[test]
    fn configured_cost_is_recorded_in_hash() {
        let hasher = PasswordHasher::new(3).unwrap();
        let hash = hasher.hash_blocking("secret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("t=3"));
        // verification reads parameters from the hash itself
        assert!(PasswordHasher::default().verify_blocking("secret", &hash).unwrap());
    }

    #[test]
    fn zero_cost_is_rejected() {
        assert!(matches!(PasswordHasher::new(0), Err(AppError::Config(_))));
    }

    #[test]
    fn malformed_hash_is_an_error_not_a_mismatch() {
        let hasher = PasswordHasher::default();
        assert!(hasher.verify_blocking("x", "not-a-phc-string").is_err());
    }

    #[tokio::test]
    async fn async_wrappers_run_off_the_runtime() {
        let hasher = PasswordHasher::default();
        let hash = hasher.hash("async-pass".to_string()).await.unwrap();
        assert!(hasher.verify("async-pass".to_string(), hash).await.unwrap());
    }
}
