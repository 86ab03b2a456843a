//! Database configuration module.
//!
//! Provides configuration structures for database connection management.

use std::env;
use thiserror::Error;

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,

    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,
}

/// A `DB_*` variable is set but cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid configuration for {var}: {reason}")]
pub struct DatabaseConfigError {
    pub var: String,
    pub reason: String,
}

impl DatabaseConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `DATABASE_URL`: PostgreSQL connection string
    /// - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 20)
    /// - `DB_MIN_CONNECTIONS`: Minimum pool size (default: 2)
    /// - `DB_CONNECTION_TIMEOUT_SECS`: Connection timeout in seconds (default: 5)
    /// - `DB_IDLE_TIMEOUT_SECS`: Idle timeout in seconds (default: 300)
    /// - `DB_MAX_LIFETIME_SECS`: Max lifetime in seconds (default: 1800)
    ///
    /// # Returns
    ///
    /// `Ok(None)` when `DATABASE_URL` is unset or blank
    ///
    /// # Errors
    ///
    /// Returns error if a pool setting is set but not a number
    pub fn from_env() -> Result<Option<Self>, DatabaseConfigError> {
        match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => Self::with_url(url).map(Some),
            _ => Ok(None),
        }
    }

    /// Build a configuration for `database_url`, reading pool settings from
    /// the environment.
    ///
    /// # Errors
    ///
    /// Same as [`DatabaseConfig::from_env`].
    pub fn with_url(database_url: String) -> Result<Self, DatabaseConfigError> {
        Self::from_vars(database_url, |key| env::var(key).ok())
    }

    fn from_vars<F>(database_url: String, var: F) -> Result<Self, DatabaseConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::development();
        Ok(Self {
            database_url,
            max_connections: parse_var(&var, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: parse_var(&var, "DB_MIN_CONNECTIONS", defaults.min_connections)?,
            connection_timeout_secs: parse_var(
                &var,
                "DB_CONNECTION_TIMEOUT_SECS",
                defaults.connection_timeout_secs,
            )?,
            idle_timeout_secs: parse_var(&var, "DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout_secs)?,
            max_lifetime_secs: parse_var(&var, "DB_MAX_LIFETIME_SECS", defaults.max_lifetime_secs)?,
        })
    }

    /// Create a default configuration for development
    ///
    /// Uses `postgres://postgres@localhost/hangman` as the database URL
    pub fn development() -> Self {
        Self {
            database_url: "postgres://postgres@localhost/hangman".to_string(),
            max_connections: 20,
            min_connections: 2,
            connection_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::development()
    }
}

fn parse_var<F, T>(var: &F, key: &str, default: T) -> Result<T, DatabaseConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match var(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| DatabaseConfigError {
            var: key.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
