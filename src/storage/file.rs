//! File-per-key storage backend.
//!
//! Each key maps to `<dir>/<key>.json`. Writes go through a temporary file
//! in the same directory and are renamed into place while holding an
//! advisory lock, so a reader never sees a half-written value and two
//! processes cannot interleave their writes.

use super::KeyValueStore;
use crate::constants;
use crate::errors::{AppResult, StorageError};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Stores every value as its own file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (creating if needed) the store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: &Path) -> AppResult<Self> {
        super::ensure_data_directory_exists(dir)?;
        debug!("Opened file store at {:?}", dir);
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self
            .dir
            .join(format!("{}.{}", key, constants::FILE_STORE_EXTENSION)))
    }

    fn lock(&self) -> Result<File, StorageError> {
        let path = self.dir.join(constants::FILE_STORE_LOCK);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|source| StorageError::Lock {
                path: path.clone(),
                source,
            })?;
        file.lock_exclusive()
            .map_err(|source| StorageError::Lock { path, source })?;
        Ok(file)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let io_error = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        let lock = self.lock()?;

        // NamedTempFile is created with 0o600 on unix.
        let mut temp = NamedTempFile::new_in(&self.dir).map_err(io_error)?;
        temp.write_all(value.as_bytes()).map_err(io_error)?;
        temp.as_file().sync_all().map_err(io_error)?;
        temp.persist(&path).map_err(|e| io_error(e.error))?;

        // Dropping the file releases the lock; unlock explicitly to surface errors.
        FileExt::unlock(&lock).map_err(io_error)?;
        debug!("Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let lock = self.lock()?;

        let result = match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        };

        drop(lock);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip() {
        let temp_dir = tempdir().unwrap();
        let store = FileStore::open(&temp_dir.path().join("store")).unwrap();

        assert!(store.get("events-1").unwrap().is_none());
        store.set("events-1", "[]").unwrap();
        assert_eq!(store.get("events-1").unwrap().as_deref(), Some("[]"));

        store.set("events-1", "[{\"id\":\"a\"}]").unwrap();
        assert_eq!(
            store.get("events-1").unwrap().as_deref(),
            Some("[{\"id\":\"a\"}]")
        );

        store.remove("events-1").unwrap();
        assert!(store.get("events-1").unwrap().is_none());
        store.remove("events-1").unwrap();
    }

    #[test]
    fn test_value_lands_in_named_file() {
        let temp_dir = tempdir().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();
        store.set("user", "{}").unwrap();

        let on_disk = fs::read_to_string(temp_dir.path().join("user.json")).unwrap();
        assert_eq!(on_disk, "{}");
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp_dir = tempdir().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();

        for key in ["../escape", "a/b", "", ".lock", "events 1"] {
            assert!(
                matches!(store.set(key, "x"), Err(StorageError::InvalidKey(_))),
                "key {:?} should be rejected",
                key
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_written_files_are_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();
        store.set("user", "{}").unwrap();

        let mode = fs::metadata(temp_dir.path().join("user.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, constants::DEFAULT_FILE_PERMISSIONS);
    }
}
