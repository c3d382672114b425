//! Application configuration loaded from environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Deployment environment. Picks the log format and default verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Env {
    Local,
    Dev,
    Prod,
}

impl Env {
    /// Default log level when neither `RUST_LOG` nor `LOG_LEVEL` is set.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Env::Local | Env::Dev => "debug",
            Env::Prod => "info",
        }
    }

    /// `dev` and `prod` emit JSON lines; `local` is human-readable.
    pub fn json_logs(&self) -> bool {
        !matches!(self, Env::Local)
    }
}

impl FromStr for Env {
    type Err = ConfigLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Env::Local),
            "dev" => Ok(Env::Dev),
            "prod" => Ok(Env::Prod),
            other => Err(ConfigLoadError::InvalidEnv(other.to_string())),
        }
    }
}

/// Application configuration loaded from `.env` and environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// `local`, `dev` or `prod`.
    pub env: Env,
    /// Server bind address (e.g. `0.0.0.0:44044`).
    pub server_addr: SocketAddr,
    /// SQLite connection URL (e.g. `sqlite://sso.db`).
    pub storage_path: String,
    /// Lifetime of issued tokens.
    pub token_ttl: Duration,
    /// Upper bound on a single request.
    pub request_timeout: Duration,
    /// Argon2 time cost, shared by every stored hash.
    pub hash_cost: u32,
    /// Log level: `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment. Call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env: Env = lookup("APP_ENV")
            .unwrap_or_else(|| "local".to_string())
            .parse()?;

        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:44044".to_string());
        let server_addr: SocketAddr = server_addr
            .parse()
            .map_err(|_| ConfigLoadError::InvalidServerAddr)?;

        let storage_path =
            lookup("STORAGE_PATH").unwrap_or_else(|| "sqlite://sso.db".to_string());
        if storage_path.trim().is_empty() {
            return Err(ConfigLoadError::MissingStoragePath);
        }

        let token_ttl = Duration::from_secs(parse_number(&lookup, "TOKEN_TTL_SECS", 3600)?);
        if token_ttl.is_zero() {
            return Err(ConfigLoadError::InvalidNumber("TOKEN_TTL_SECS"));
        }
        let request_timeout =
            Duration::from_secs(parse_number(&lookup, "REQUEST_TIMEOUT_SECS", 10)?);
        let hash_cost = parse_number(&lookup, "HASH_COST", 2)?;
        let hash_cost = u32::try_from(hash_cost)
            .ok()
            .filter(|c| *c >= 1)
            .ok_or(ConfigLoadError::InvalidNumber("HASH_COST"))?;

        let log_level =
            lookup("LOG_LEVEL").unwrap_or_else(|| env.default_log_level().to_string());

        Ok(Self {
            env,
            server_addr,
            storage_path,
            token_ttl,
            request_timeout,
            hash_cost,
            log_level,
        })
    }
}

fn parse_number<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigLoadError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigLoadError::InvalidNumber(key)),
        None => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Invalid SERVER_ADDR")]
    InvalidServerAddr,
    #[error("Invalid APP_ENV {0:?}: expected local, dev or prod")]
    InvalidEnv(String),
    #[error("STORAGE_PATH is empty")]
    MissingStoragePath,
    #[error("Invalid value for {0}")]
    InvalidNumber(&'static str),
}
