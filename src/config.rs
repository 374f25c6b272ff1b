use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackendKind {
    Redis,
    Memory,
}

impl FromStr for StoreBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(StoreBackendKind::Redis),
            "memory" => Ok(StoreBackendKind::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub redis_url: String,
    pub jwt_secret: String,
    pub jwt_audience: String,
    pub allowed_origins: Vec<String>,
    pub store_backend: StoreBackendKind,
    pub store_quota_bytes: usize,
    pub leaderboard_cache_ttl_secs: u64,
    pub vote_lock_ttl_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            port: try_load("PORT", "3001")?,
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_audience: try_load("JWT_AUDIENCE", "authenticated")?,
            allowed_origins: try_load::<String>("ALLOWED_ORIGINS", "http://localhost:3000")?
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            store_backend: try_load("DEMO_STORE_BACKEND", "redis")?,
            store_quota_bytes: try_load("DEMO_STORE_QUOTA_BYTES", "5242880")?,
            leaderboard_cache_ttl_secs: try_load("LEADERBOARD_CACHE_TTL_SECS", "60")?,
            vote_lock_ttl_ms: try_load("VOTE_LOCK_TTL_MS", "5000")?,
        })
    }
}

fn required(key: &str) -> Result<String, AppError> {
    env::var(key).map_err(|_| AppError::EnvError(format!("{key} must be set")))
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        AppError::EnvError(format!("Invalid {key} value '{raw}': {e}"))
    })
}
