//! Process configuration
//!
//! Database credentials are read once at startup and handed to the
//! connection provider; nothing below this module reads the environment.

use std::fmt;
use std::net::SocketAddr;

use sqlx::mysql::MySqlConnectOptions;
use thiserror::Error;

/// Default MySQL port when `DB_PORT` is unset
pub const DEFAULT_DB_PORT: u16 = 3306;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// MySQL credentials (`DB_HOST`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`)
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .finish()
    }
}

impl DatabaseConfig {
    /// Build from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// `DB_PASSWORD` may be empty; host, user and database name may not.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| -> Result<String, ConfigError> {
            match lookup(var) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(ConfigError::Missing(var)),
            }
        };

        let port = match lookup("DB_PORT") {
            Some(raw) if !raw.trim().is_empty() => {
                raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                    var: "DB_PORT",
                    reason: e.to_string(),
                })?
            }
            _ => DEFAULT_DB_PORT,
        };

        Ok(Self {
            host: required("DB_HOST")?,
            port,
            user: required("DB_USER")?,
            password: lookup("DB_PASSWORD").unwrap_or_default(),
            name: required("DB_NAME")?,
        })
    }

    /// Driver connect options for these credentials.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:5000)
    pub bind_addr: SocketAddr,

    /// Allow any origin (default: true, the browser frontend is served separately)
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            cors_permissive: true,
        }
    }
}
