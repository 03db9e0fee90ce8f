//! Layered configuration loading and validation.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Directory holding project-local configuration and the default database.
pub const CONFIG_DIR: &str = ".user-cache";

/// Prefix for environment overrides, e.g. `USER_CACHE_SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "USER_CACHE_";

/// Configuration error types
/// A loaded configuration that fails validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Unknown `logging.level`.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unknown `logging.format`.
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// `database.path` is blank.
    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    /// `database.max_connections` is zero.
    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    /// `server.host` is blank.
    #[error("Server host cannot be empty")]
    EmptyHost,

    /// `server.port` is zero.
    #[error("Invalid port: {0}. Must be between 1 and 65535")]
    InvalidPort(u16),

    /// `cache.lock_stripes` is zero.
    #[error("Invalid lock_stripes: {0}. Must be at least 1")]
    InvalidLockStripes(usize),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .user-cache/config.yaml (project config, created by init)
    /// 3. .user-cache/local.yaml (project local overrides, optional)
    /// 4. Environment variables (USER_CACHE_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Self::base()
            .merge(Yaml::file(Path::new(CONFIG_DIR).join("config.yaml")))
            .merge(Yaml::file(Path::new(CONFIG_DIR).join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Self::base()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise from the project hierarchy
    pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    fn base() -> Figment {
        Figment::new().merge(Serialized::defaults(Config::default()))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        // Validate server config
        if config.server.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }

        if config.server.port == 0 {
            return Err(ConfigError::InvalidPort(config.server.port));
        }

        // Validate database config
        if config.database.path.is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }

        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(
                config.database.max_connections,
            ));
        }

        // Validate logging config
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        // Validate cache config
        if config.cache.lock_stripes == 0 {
            return Err(ConfigError::InvalidLockStripes(config.cache.lock_stripes));
        }

        Ok(())
    }
}
