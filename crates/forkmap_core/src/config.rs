//! TOML configuration for the core and its front ends.
//!
//! # Invariants
//! - Every field has a default, so an empty file is a valid configuration.
//! - `validate()` runs on every load path; invalid values never reach the
//!   import pipeline.
//!
//! Example:
//!
//! ```toml
//! [database]
//! path = "/var/lib/forkmap/forkmap.db"
//!
//! [logging]
//! level = "info"
//! dir = "/var/log/forkmap"
//!
//! [import]
//! dedup_threshold_meters = 5.0
//! list_name_max_chars = 20
//! resolve_workers = 4
//! fetch_timeout_secs = 30
//! ```

use crate::geo::DEFAULT_SAME_PLACE_THRESHOLD_METERS;
use crate::logging::default_log_level;
use crate::model::LIST_NAME_MAX_CHARS;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_DB_FILE: &str = "forkmap.db";
const DEFAULT_LIST_NAME_MAX_CHARS: usize = 20;
const DEFAULT_RESOLVE_WORKERS: usize = 4;
const MAX_RESOLVE_WORKERS: usize = 32;

/// Configuration loading/validation error.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config syntax: {err}"),
            Self::Invalid(message) => write!(f, "invalid config value: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub import: ImportConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_FILE),
        }
    }
}

/// Logging level and optional absolute directory for rotating files.
/// Without `dir`, logs go to stderr.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

/// Tuning for the Takeout import pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    /// Candidates closer than this to an existing restaurant reuse it.
    pub dedup_threshold_meters: f64,
    /// List names derived from file names are cut to this many characters.
    pub list_name_max_chars: usize,
    /// Size of the URL resolution worker pool; `1` resolves sequentially.
    pub resolve_workers: usize,
    /// Overall per-request timeout. `None` waits indefinitely.
    pub fetch_timeout_secs: Option<u64>,
    /// `User-Agent` header sent when fetching place pages.
    pub user_agent: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            dedup_threshold_meters: DEFAULT_SAME_PLACE_THRESHOLD_METERS,
            list_name_max_chars: DEFAULT_LIST_NAME_MAX_CHARS,
            resolve_workers: DEFAULT_RESOLVE_WORKERS,
            fetch_timeout_secs: None,
            user_agent: None,
        }
    }
}

impl ImportConfig {
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dedup_threshold_meters.is_finite() || self.dedup_threshold_meters <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "import.dedup_threshold_meters must be a positive number, got {}",
                self.dedup_threshold_meters
            )));
        }
        if self.list_name_max_chars == 0 || self.list_name_max_chars > LIST_NAME_MAX_CHARS {
            return Err(ConfigError::Invalid(format!(
                "import.list_name_max_chars must be in 1..={LIST_NAME_MAX_CHARS}, got {}",
                self.list_name_max_chars
            )));
        }
        if self.resolve_workers == 0 || self.resolve_workers > MAX_RESOLVE_WORKERS {
            return Err(ConfigError::Invalid(format!(
                "import.resolve_workers must be in 1..={MAX_RESOLVE_WORKERS}, got {}",
                self.resolve_workers
            )));
        }
        if self.fetch_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "import.fetch_timeout_secs must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Reads and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "database.path must not be empty".to_string(),
            ));
        }
        self.import.validate()
    }
}
