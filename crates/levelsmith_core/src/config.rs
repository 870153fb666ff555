//! Runtime configuration from the environment.
//!
//! # Responsibility
//! - Resolve database path, logging and name-allocation settings.
//!
//! # Invariants
//! - Missing variables fall back to defaults; malformed values are errors,
//!   never silently ignored.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use crate::names::{NameAllocator, WordSource, DEFAULT_MAX_NAME_ATTEMPTS};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "LEVELSMITH_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "LEVELSMITH_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "LEVELSMITH_LOG_DIR";
pub const ENV_NAME_ATTEMPTS: &str = "LEVELSMITH_NAME_ATTEMPTS";

const DEFAULT_DB_FILE_NAME: &str = "levelsmith.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
    pub max_name_attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    InvalidLogDir(String),
    InvalidNameAttempts(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{ENV_LOG_LEVEL}: {message}"),
            Self::InvalidLogDir(message) => write!(f, "{ENV_LOG_DIR}: {message}"),
            Self::InvalidNameAttempts(value) => write!(
                f,
                "{ENV_NAME_ATTEMPTS}: expected a positive integer, got `{value}`"
            ),
        }
    }
}

impl Error for ConfigError {}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            max_name_attempts: DEFAULT_MAX_NAME_ATTEMPTS,
        }
    }
}

impl CoreConfig {
    /// Reads `LEVELSMITH_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Blank values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(normalize_log_dir(&dir).map_err(ConfigError::InvalidLogDir)?);
        }
        if let Some(raw) = read(ENV_NAME_ATTEMPTS) {
            config.max_name_attempts = match raw.parse::<u32>() {
                Ok(value) if value > 0 => value,
                _ => return Err(ConfigError::InvalidNameAttempts(raw)),
            };
        }

        Ok(config)
    }

    /// Builds a name allocator honoring `max_name_attempts`.
    pub fn name_allocator<W: WordSource>(&self, source: W) -> NameAllocator<W> {
        NameAllocator::new(source).with_max_attempts(self.max_name_attempts)
    }
}
