//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use hangman::{
    db::{DatabaseConfig, DatabaseConfigError},
    service::GameSettings,
};
use std::{net::SocketAddr, path::PathBuf};

/// Local dev-server origins allowed when `CORS_ALLOWED_ORIGINS` is unset
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:4200", "http://localhost:3000"];

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Database configuration, `None` keeps games in memory
    pub database: Option<DatabaseConfig>,
    /// Game defaults configuration
    pub game: GameDefaultsConfig,
    /// Prometheus listener address, `None` disables the exporter
    pub metrics_bind: Option<SocketAddr>,
    /// Allowed CORS origins; `*` allows any origin
    pub cors_origins: Vec<String>,
}

/// Default game configuration
#[derive(Debug, Clone)]
pub struct GameDefaultsConfig {
    /// Attempts allowed when a client does not choose
    pub default_max_attempts: u32,
    /// Largest attempt limit a client may choose
    pub max_allowed_attempts: u32,
    /// Word list file, one word per line. `None` uses the built-in list
    pub words_file: Option<PathBuf>,
    /// Seed for reproducible word picks
    pub word_seed: Option<u64>,
}

impl GameDefaultsConfig {
    /// Attempt limits for the game service
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            default_max_attempts: self.default_max_attempts,
            max_allowed_attempts: self.max_allowed_attempts,
        }
    }
}

impl Default for GameDefaultsConfig {
    fn default() -> Self {
        let settings = GameSettings::default();
        Self {
            default_max_attempts: settings.default_max_attempts,
            max_allowed_attempts: settings.max_allowed_attempts,
            words_file: None,
            word_seed: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `database_url_override` - Optional database URL override (from CLI args)
    /// * `words_file_override` - Optional word list path override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
        words_file_override: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_env("SERVER_BIND")?
                .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080))),
        };

        let database = match database_url_override.filter(|url| !url.trim().is_empty()) {
            Some(url) => Some(DatabaseConfig::with_url(url)?),
            None => DatabaseConfig::from_env()?,
        };

        let defaults = GameDefaultsConfig::default();
        let game = GameDefaultsConfig {
            default_max_attempts: parse_env("GAME_DEFAULT_MAX_ATTEMPTS")?
                .unwrap_or(defaults.default_max_attempts),
            max_allowed_attempts: parse_env("GAME_MAX_ALLOWED_ATTEMPTS")?
                .unwrap_or(defaults.max_allowed_attempts),
            words_file: words_file_override
                .or_else(|| std::env::var("WORDS_FILE").ok().map(PathBuf::from)),
            word_seed: parse_env("WORD_SEED")?,
        };

        let metrics_bind = parse_env("METRICS_BIND")?;

        let cors_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect());

        Ok(ServerConfig {
            bind,
            database,
            game,
            metrics_bind,
            cors_origins,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.max_allowed_attempts == 0 {
            return Err(ConfigError::Invalid {
                var: "GAME_MAX_ALLOWED_ATTEMPTS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.game.default_max_attempts == 0 {
            return Err(ConfigError::Invalid {
                var: "GAME_DEFAULT_MAX_ATTEMPTS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.game.default_max_attempts > self.game.max_allowed_attempts {
            return Err(ConfigError::Invalid {
                var: "GAME_DEFAULT_MAX_ATTEMPTS".to_string(),
                reason: format!(
                    "Must not exceed GAME_MAX_ALLOWED_ATTEMPTS ({})",
                    self.game.max_allowed_attempts
                ),
            });
        }

        if let Some(database) = &self.database {
            if database.min_connections > database.max_connections {
                return Err(ConfigError::Invalid {
                    var: "DB_MIN_CONNECTIONS".to_string(),
                    reason: format!(
                        "Must not exceed DB_MAX_CONNECTIONS ({})",
                        database.max_connections
                    ),
                });
            }
        }

        if self.cors_origins.is_empty() {
            return Err(ConfigError::Invalid {
                var: "CORS_ALLOWED_ORIGINS".to_string(),
                reason: "Must list at least one origin (or *)".to_string(),
            });
        }

        Ok(())
    }

    /// Whether any origin may call the API
    pub fn cors_permissive(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

impl From<DatabaseConfigError> for ConfigError {
    fn from(err: DatabaseConfigError) -> Self {
        ConfigError::Invalid {
            var: err.var,
            reason: err.reason,
        }
    }
}

/// Parse an optional environment variable, failing on malformed values
fn parse_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                var: key.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
