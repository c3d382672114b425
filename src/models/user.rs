//! User and application records owned by the credential store.

use std::fmt;

/// A registered user. `pass_hash` is an argon2 PHC string, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub pass_hash: String,
}

/// A client application. Tokens issued for it are signed with its own secret.
#[derive(Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct App {
    pub id: i32,
    pub name: String,
    secret: String,
}

impl App {
    pub fn new(id: i32, name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            secret: secret.into(),
        }
    }

    /// Signing secret. Only the token issuer reads this.
    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_debug_hides_secret() {
        let app = App::new(1, "test", "super-secret-value");
        let printed = format!("{:?}", app);
        assert!(printed.contains("test"));
        assert!(!printed.contains("super-secret-value"));
    }
}
