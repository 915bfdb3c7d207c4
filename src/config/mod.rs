//! Configuration management for the happyday application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults.
//!
//! # Environment Variables
//!
//! - `HAPPYDAY_DIR`: Path to the data directory (defaults to ~/.happyday)
//! - `HAPPYDAY_STORAGE`: Storage backend, `sqlite` (default) or `file`
//! - `HAPPYDAY_AUTH_LATENCY_MS`: Simulated login/register latency (defaults to 1000)
//! - `HAPPYDAY_WEEK_START`: First weekday of the calendar grid (defaults to sunday)
//! - `HAPPYDAY_IMAGE_MAX_DIMENSION`: Longest side of an attached image (defaults to 1920)
//! - `HAPPYDAY_IMAGE_MAX_BYTES`: Encoded size bound of an attached image (defaults to 1 MiB)
//! - `HOME`: Used for expanding the default data directory path

use crate::constants;
use crate::errors::{AppError, AppResult, ValidationError};
use crate::image::ImageOptions;
use chrono::Weekday;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which key-value backend holds sessions and entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// One SQLite database file with a `kv` table.
    Sqlite,
    /// One JSON file per key.
    File,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "file" => Ok(StorageBackend::File),
            other => Err(AppError::Config(format!(
                "Unknown storage backend '{}'. Expected 'sqlite' or 'file'",
                other
            ))),
        }
    }
}

/// Configuration for the happyday application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use happyday::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/path/to/data"),
///     ..Config::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct Config {
    /// Directory holding the storage backend's files.
    pub data_dir: PathBuf,

    /// Selected storage backend.
    pub backend: StorageBackend,

    /// Simulated network round-trip for login, register and password change.
    pub auth_latency: Duration,

    /// First weekday of every calendar row.
    pub week_start: Weekday,

    /// Limits applied when attaching an image to an entry.
    pub image: ImageOptions,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &constants::REDACTED_PLACEHOLDER)
            .field("backend", &self.backend)
            .field("auth_latency", &self.auth_latency)
            .field("week_start", &self.week_start)
            .field("image", &self.image)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(""),
            backend: StorageBackend::Sqlite,
            auth_latency: Duration::from_millis(constants::DEFAULT_AUTH_LATENCY_MS),
            week_start: Weekday::Sun,
            image: ImageOptions::default(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The data directory is expanded using `shellexpand` to handle `~` and
    /// environment variable references.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The data directory path expansion fails or yields an empty path
    /// - A numeric variable does not parse
    /// - The storage backend or weekday is unknown
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use happyday::Config;
    ///
    /// match Config::load() {
    ///     Ok(config) => println!("Loaded config: {:?}", config),
    ///     Err(err) => eprintln!("Failed to load config: {}", err),
    /// }
    /// ```
    pub fn load() -> AppResult<Self> {
        let data_dir_str = env::var(constants::ENV_VAR_HAPPYDAY_DIR).unwrap_or_else(|_| {
            let home = env::var(constants::ENV_VAR_HOME).unwrap_or_default();
            format!("{}/{}", home, constants::DEFAULT_DATA_SUBDIR)
        });

        let expanded_path = shellexpand::full(&data_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        let data_dir = PathBuf::from(expanded_path.into_owned());

        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        let backend = match env::var(constants::ENV_VAR_HAPPYDAY_STORAGE) {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::Sqlite,
        };

        let latency_ms = parse_env_number(
            constants::ENV_VAR_HAPPYDAY_AUTH_LATENCY_MS,
            constants::DEFAULT_AUTH_LATENCY_MS,
        )?;

        let week_start = match env::var(constants::ENV_VAR_HAPPYDAY_WEEK_START) {
            Ok(value) => parse_weekday(&value)?,
            Err(_) => Weekday::Sun,
        };

        let image = ImageOptions {
            max_dimension: parse_env_number(
                constants::ENV_VAR_HAPPYDAY_IMAGE_MAX_DIMENSION,
                constants::DEFAULT_IMAGE_MAX_DIMENSION,
            )?,
            max_bytes: parse_env_number(
                constants::ENV_VAR_HAPPYDAY_IMAGE_MAX_BYTES,
                constants::DEFAULT_IMAGE_MAX_BYTES,
            )?,
        };

        Ok(Config {
            data_dir,
            backend,
            auth_latency: Duration::from_millis(latency_ms),
            week_start,
            image,
        })
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` with one of the following messages:
    /// - "Data directory path is empty"
    /// - "Data directory must be an absolute path"
    /// - "Image limits must be greater than zero"
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }

        if self.image.max_dimension == 0 || self.image.max_bytes == 0 {
            return Err(AppError::Config(
                "Image limits must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_env_number<T: FromStr>(var: &str, default: T) -> AppResult<T> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a number, got '{}'", var, raw))),
        Err(_) => Ok(default),
    }
}

/// Parses a weekday name such as `monday` or `Mon`.
pub fn parse_weekday(value: &str) -> AppResult<Weekday> {
    value
        .trim()
        .parse::<Weekday>()
        .map_err(|_| ValidationError::UnknownWeekday(value.to_string()).into())
}
