//! Configuration loading and validation for the expense service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated expense service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// PostgreSQL connection string. **Required.**
    pub database_url: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Username accepted by HTTP Basic authentication.
    #[serde(default = "default_auth_username")]
    pub auth_username: String,

    /// Password accepted by HTTP Basic authentication.
    #[serde(default = "default_auth_password")]
    pub auth_password: String,

    /// Upper bound on pooled database connections.
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// How long (seconds) in-flight requests may run after a termination signal.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_secs: u64,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_port() -> u16 {
    2565
}
fn default_auth_username() -> String {
    "admin".into()
}
fn default_auth_password() -> String {
    "admin".into()
}
fn default_db_max_connections() -> u32 {
    5
}
fn default_shutdown_grace() -> u64 {
    10
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Grace period granted to in-flight requests on shutdown.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.database_url, "DATABASE_URL")?;
        ensure_non_empty(&self.auth_username, "AUTH_USERNAME")?;
        ensure_non_empty(&self.auth_password, "AUTH_PASSWORD")?;

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be > 0");
        }
        if self.shutdown_grace_secs == 0 {
            anyhow::bail!("SHUTDOWN_GRACE_SECS must be > 0");
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The connection string usually embeds a password.
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("port", &self.port)
            .field("auth_username", &self.auth_username)
            .field("auth_password", &"[REDACTED]")
            .field("db_max_connections", &self.db_max_connections)
            .field("shutdown_grace_secs", &self.shutdown_grace_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
