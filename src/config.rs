//! Server configuration loaded from the environment (and `.env`).

use std::{env, str::FromStr, time::Duration};

use derive_more::{Display, Error};
use dotenv::dotenv;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
#[display(fmt = "invalid value for {}: '{}'", key, value)]
pub struct ConfigError {
    #[error(not(source))]
    pub key: &'static str,
    #[error(not(source))]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Env: `DATABASE_URL`. Unset means the in-memory store.
    pub database_url: Option<String>,
    /// Env: `DB_MAX_CONNECTIONS`, default 5.
    pub max_connections: u32,
    /// Env: `HOST`, default `127.0.0.1`.
    pub host: String,
    /// Env: `PORT`, default 5001.
    pub port: u16,
    /// Env: `LOGIN_MAX_FAILURES`, default 5.
    pub login_max_failures: u32,
    /// Env: `LOGIN_LOCKOUT_SECS`, default 900.
    pub login_lockout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 5,
            host: "127.0.0.1".to_string(),
            port: 5001,
            login_max_failures: 5,
            login_lockout: Duration::from_secs(15 * 60),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            login_max_failures: parse_or(&lookup, "LOGIN_MAX_FAILURES", defaults.login_max_failures)?,
            login_lockout: Duration::from_secs(parse_or(
                &lookup,
                "LOGIN_LOCKOUT_SECS",
                defaults.login_lockout.as_secs(),
            )?),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError { key, value }),
        None => Ok(default),
    }
}
