//! Core runtime configuration.
//!
//! # Responsibility
//! - Resolve data directory, database file, log level and retention policy.
//! - Read `LAZYLIFE_*` environment overrides on top of defaults.
//!
//! # Invariants
//! - A retention of `0` days (or `off`) disables the task sweep.
//! - Invalid override values are rejected, never silently ignored.

use crate::logging::default_log_level;
use crate::service::autosave::DEFAULT_AUTOSAVE_DELAY_MS;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DATA_DIR: &str = "LAZYLIFE_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "LAZYLIFE_LOG_LEVEL";
pub const ENV_RETENTION_DAYS: &str = "LAZYLIFE_RETENTION_DAYS";
pub const ENV_AUTOSAVE_MS: &str = "LAZYLIFE_AUTOSAVE_MS";

const DEFAULT_DATA_DIR_NAME: &str = ".lazylife";
const DEFAULT_DB_FILE_NAME: &str = "lazylife.sqlite3";
const DEFAULT_RETENTION_DAYS: u32 = 30;
const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for {key}")
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    pub db_file_name: String,
    pub log_level: String,
    /// `None` disables the task retention sweep.
    pub retention_days: Option<u32>,
    pub autosave_delay_ms: i64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
        Self {
            data_dir: home.join(DEFAULT_DATA_DIR_NAME),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            log_level: default_log_level().to_string(),
            retention_days: Some(DEFAULT_RETENTION_DAYS),
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
        }
    }
}

impl CoreConfig {
    /// Defaults overlaid with process environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir.trim());
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            config.log_level = level.trim().to_ascii_lowercase();
        }
        if let Some(raw) = lookup(ENV_RETENTION_DAYS) {
            config.retention_days = parse_retention_days(&raw)?;
        }
        if let Some(raw) = lookup(ENV_AUTOSAVE_MS) {
            config.autosave_delay_ms = raw
                .trim()
                .parse::<u32>()
                .map(i64::from)
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_AUTOSAVE_MS,
                    value: raw.clone(),
                })?;
        }

        Ok(config)
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Retention window in milliseconds, if enabled.
    pub fn retention_ms(&self) -> Option<i64> {
        self.retention_days.map(|days| i64::from(days) * DAY_MS)
    }
}

fn parse_retention_days(raw: &str) -> Result<Option<u32>, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("off") {
        return Ok(None);
    }
    match trimmed.parse::<u32>() {
        Ok(0) => Ok(None),
        Ok(days) => Ok(Some(days)),
        Err(_) => Err(ConfigError::InvalidValue {
            key: ENV_RETENTION_DAYS,
            value: raw.to_string(),
        }),
    }
}
