use std::{env, fmt::Display, str::FromStr, time::Duration};

use anyhow::{Result, anyhow, bail};
use tracing::{info, warn};

pub const DEFAULT_PORT: &str = "5000";
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
pub const DEFAULT_PREDICTOR_URL: &str = "http://127.0.0.1:8000/predict";
pub const DEFAULT_PREDICTOR_TIMEOUT_MS: &str = "5000";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub redis_url: String,
    pub predictor_url: String,
    pub predictor_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_with(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `load` passes the
    /// process environment.
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_ms: u64 = try_load(&lookup, "PREDICTOR_TIMEOUT_MS", DEFAULT_PREDICTOR_TIMEOUT_MS)?;
        if timeout_ms == 0 {
            bail!("PREDICTOR_TIMEOUT_MS must be greater than zero");
        }

        Ok(Self {
            port: try_load(&lookup, "RUST_PORT", DEFAULT_PORT)?,
            store_backend: try_load(&lookup, "STORE_BACKEND", "redis")?,
            redis_url: try_load(&lookup, "REDIS_URL", DEFAULT_REDIS_URL)?,
            predictor_url: try_load(&lookup, "PREDICTOR_URL", DEFAULT_PREDICTOR_URL)?,
            predictor_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

fn var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn try_load<F, T>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let raw = var(lookup, key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim().parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow!("Environment misconfigured: {key}: {e}")
    })
}
