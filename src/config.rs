//! Host configuration parsed from environment variables.
//!
//! Required:
//! - `DATABASE_URL`: Postgres connection string for the `items` table
//! - `STORAGE_URL`: base URL of the object store (e.g. `https://x.supabase.co`)
//! - `STORAGE_KEY`: service key sent as bearer token and `apikey`
//!
//! Optional:
//! - `STORAGE_BUCKET`: default `files`
//! - `VIEWPORT_WIDTH` / `VIEWPORT_HEIGHT`: headless viewport, default 1280x800
//! - `NOTICE_TTL_MS`: how long notices stay visible, default 4000
//!
//! Optional values that fail to parse fall back to their defaults.

use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_STORAGE_BUCKET: &str = "files";
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;
pub const DEFAULT_NOTICE_TTL_MS: u64 = 4000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub url: String,
    pub key: String,
    pub bucket: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub storage: StorageConfig,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub notice_ttl: Duration,
}

impl Config {
    /// Build config from the process environment (after loading `.env`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if a required variable is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if a required variable is unset or empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = required(&lookup, "DATABASE_URL")?;
        let storage = StorageConfig {
            url: required(&lookup, "STORAGE_URL")?.trim_end_matches('/').to_string(),
            key: required(&lookup, "STORAGE_KEY")?,
            bucket: lookup("STORAGE_BUCKET")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_STORAGE_BUCKET.to_string()),
        };

        Ok(Self {
            database_url,
            storage,
            viewport_width: env_parse(&lookup, "VIEWPORT_WIDTH", DEFAULT_VIEWPORT_WIDTH),
            viewport_height: env_parse(&lookup, "VIEWPORT_HEIGHT", DEFAULT_VIEWPORT_HEIGHT),
            notice_ttl: Duration::from_millis(env_parse(&lookup, "NOTICE_TTL_MS", DEFAULT_NOTICE_TTL_MS)),
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<String, ConfigError> {
    lookup(key).filter(|v| !v.is_empty()).ok_or(ConfigError::Missing(key))
}

fn env_parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
