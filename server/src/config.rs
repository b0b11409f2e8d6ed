//! Environment-driven configuration.
//!
//! Recognised variables (a `.env` file is loaded first when present):
//! - `DATABASE_URL`: SQLite connection string (default `sqlite://todo.db`)
//! - `HOST` / `PORT`: listen address (default `127.0.0.1:3000`)
//! - `LOG_LEVEL`: `tracing` filter directive (default `info`)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default `5`)

use crate::error::ConfigError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://todo.db";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Missing .env is fine.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                var: "PORT".into(),
                message: format!("{raw:?}: {e}"),
            })?,
            None => defaults.port,
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(0) => {
                    return Err(ConfigError::InvalidValue {
                        var: "DATABASE_MAX_CONNECTIONS".into(),
                        message: "must be at least 1".into(),
                    })
                }
                Ok(n) => n,
                Err(e) => {
                    return Err(ConfigError::InvalidValue {
                        var: "DATABASE_MAX_CONNECTIONS".into(),
                        message: format!("{raw:?}: {e}"),
                    })
                }
            },
            None => defaults.max_connections,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            max_connections,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
