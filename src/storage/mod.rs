//! Key-value persistence for sessions and journal entries.
//!
//! Everything the application persists is a JSON string stored under a
//! small set of keys (`user`, `events-<userId>`). This module defines the
//! `KeyValueStore` interface and its backends.
//!
//! # Module Structure
//!
//! - `file`: One JSON file per key inside the data directory
//! - `sqlite`: A single SQLite table behind an r2d2 pool
//! - `MemoryStore`: A process-local map, used by tests

pub mod file;
pub mod sqlite;

use crate::config::{Config, StorageBackend};
use crate::constants;
use crate::errors::{AppError, AppResult, StorageError};
use std::collections::HashMap;
#[cfg(unix)]
use std::fs::Permissions;
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

pub use file::FileStore;
pub use sqlite::SqliteStore;

/// String-valued key-value storage.
///
/// Reads of a missing key return `Ok(None)`; removing a missing key is not
/// an error.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory backend.
///
/// # Examples
///
/// ```
/// use happyday::storage::{KeyValueStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.set("user", "{}").unwrap();
/// assert_eq!(store.get("user").unwrap().as_deref(), Some("{}"));
/// store.remove("user").unwrap();
/// assert!(store.get("user").unwrap().is_none());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        values.remove(key);
        Ok(())
    }
}

/// Slot holding the entries of `user_id`.
pub fn events_key(user_id: &str) -> String {
    format!("{}{}", constants::EVENTS_KEY_PREFIX, user_id)
}

/// Opens the backend selected by `config`, creating the data directory if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the backend fails to open.
pub fn open(config: &Config) -> AppResult<Arc<dyn KeyValueStore>> {
    ensure_data_directory_exists(&config.data_dir)?;

    let store: Arc<dyn KeyValueStore> = match config.backend {
        StorageBackend::Sqlite => {
            let path = config.data_dir.join(constants::SQLITE_FILENAME);
            Arc::new(SqliteStore::open(&path)?)
        }
        StorageBackend::File => {
            let dir = config.data_dir.join(constants::FILE_STORE_SUBDIR);
            Arc::new(FileStore::open(&dir)?)
        }
    };

    info!("Opened {:?} storage", config.backend);
    Ok(store)
}

/// Ensures the data directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns:
/// - `AppError::Config` if the provided path is not an absolute path
/// - `AppError::Io` if the directory creation fails
pub fn ensure_data_directory_exists(data_dir: &Path) -> AppResult<()> {
    if !data_dir.is_absolute() {
        return Err(AppError::Config(format!(
            "Data directory path must be absolute: {}",
            data_dir.display()
        )));
    }

    if !data_dir.exists() {
        fs::create_dir_all(data_dir).map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create data directory: {}", e),
            ))
        })?;

        #[cfg(unix)]
        {
            let permissions = Permissions::from_mode(constants::DEFAULT_DIR_PERMISSIONS);
            fs::set_permissions(data_dir, permissions).map_err(|e| {
                AppError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to set secure permissions on data directory: {}", e),
                ))
            })?;
            debug!("Set 0o700 permissions on data directory");
        }
    }
    Ok(())
}
