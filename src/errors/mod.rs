//! Error handling utilities for the happyday application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents the failures of the simulated authentication layer.
///
/// # Examples
///
/// ```
/// use happyday::errors::AuthError;
///
/// let error = AuthError::InvalidCredentials;
/// assert_eq!(format!("{}", error), "Invalid credentials");
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The username/password pair is not the demo account.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The current password did not match, or the active user cannot change it.
    #[error("Current password is incorrect")]
    PasswordChangeRejected,

    /// An operation that needs a session was attempted while logged out.
    #[error("Not logged in. Run `happyday login <USERNAME>` first.")]
    NotAuthenticated,
}

/// Represents input rejected at the editing boundary.
///
/// # Examples
///
/// ```
/// use happyday::errors::ValidationError;
///
/// let error = ValidationError::UnknownMood("grumpy".to_string());
/// assert!(format!("{}", error).contains("grumpy"));
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Entry titles must contain something other than whitespace.
    #[error("Title required: please enter a title for your journal entry")]
    EmptyTitle,

    /// A date string that is neither YYYY-MM-DD nor YYYYMMDD.
    #[error("Invalid date format: '{0}'. Expected YYYY-MM-DD or YYYYMMDD")]
    InvalidDate(String),

    /// A month string that is neither YYYY-MM nor a full date.
    #[error("Invalid month format: '{0}'. Expected YYYY-MM")]
    InvalidMonth(String),

    /// A mood outside the fixed enumeration.
    #[error("Unknown mood '{0}'. Expected one of: happy, sad, angry, excited, confused")]
    UnknownMood(String),

    /// A weekday name that could not be parsed.
    #[error("Unknown weekday '{0}'")]
    UnknownWeekday(String),
}

/// Represents failures of the image compression pipeline.
///
/// Every variant surfaces to the user as an image processing failure; the
/// variants only differ in which stage broke.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The image file could not be read.
    #[error("Failed to read image {path}: {source}")]
    Read {
        /// Path of the image file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The file content is not an image format we can decode.
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// Re-encoding the downscaled image failed.
    #[error("Failed to compress image: {0}")]
    Encode(#[source] image::ImageError),

    /// Even the lowest quality setting exceeds the size limit.
    #[error("Image is still {size} bytes after compression (limit {limit} bytes)")]
    TooLarge {
        /// Encoded size at the lowest quality
        size: usize,
        /// Configured byte limit
        limit: usize,
    },
}

/// Represents specific error cases that can occur in a key-value backend.
///
/// # Examples
///
/// ```
/// use happyday::errors::StorageError;
///
/// let error = StorageError::InvalidKey("../etc".to_string());
/// assert!(format!("{}", error).contains("../etc"));
/// ```
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite database error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}")]
    Pool(#[from] r2d2::Error),

    /// Filesystem error in the file backend.
    #[error("Storage I/O error for key '{key}': {source}")]
    Io {
        /// The key being read or written
        key: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Keys map to file names, so only a safe character set is accepted.
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    /// The write lock of the file backend could not be taken.
    #[error("Failed to lock storage directory {path}: {source}")]
    Lock {
        /// Lock file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A stored value is not the JSON we expect.
    #[error("Stored value for key '{key}' is not valid: {source}")]
    Corrupt {
        /// The key holding the bad value
        key: String,
        /// The JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory backend's lock was poisoned by a panicking writer.
    #[error("In-memory storage is unavailable")]
    Poisoned,
}

/// Represents all possible errors that can occur in the happyday application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use happyday::errors::AppError;
///
/// let error = AppError::Config("Missing data directory".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing data directory");
/// ```
///
/// Converting from an authentication error:
/// ```
/// use happyday::errors::{AppError, AuthError};
///
/// let app_error: AppError = AuthError::InvalidCredentials.into();
/// assert!(matches!(app_error, AppError::Auth(AuthError::InvalidCredentials)));
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Login, registration and password change failures.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Input rejected before it reaches a store.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Image compression or encoding failed.
    #[error("Image processing failed: {0}")]
    Image(#[from] ImageError),

    /// Reading from a storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Writing to a storage backend failed; the in-memory state was left unchanged.
    #[error("Could not save: {0}")]
    SaveFailed(#[source] StorageError),

    /// An update targeted an id that is not in the active collection.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(String),

    /// The logged-in user's collection could not be loaded, so entry
    /// commands are refused until it can be.
    #[error("Entries of user {user} are unavailable: {reason}")]
    EntriesUnavailable {
        /// Id of the logged-in user
        user: String,
        /// Why the last load failed
        reason: String,
    },
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use happyday::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Config("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_error: AppError = io_error.into();

        match app_error {
            AppError::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::NotFound),
            _ => panic!("Expected AppError::Io variant"),
        }
    }

    #[test]
    fn test_auth_errors_display_without_prefix() {
        let error: AppError = AuthError::InvalidCredentials.into();
        assert_eq!(error.to_string(), "Invalid credentials");

        let error: AppError = AuthError::PasswordChangeRejected.into();
        assert!(error.to_string().contains("incorrect"));
    }

    #[test]
    fn test_save_failed_is_reported_as_could_not_save() {
        let error = AppError::SaveFailed(StorageError::Poisoned);
        assert!(error.to_string().starts_with("Could not save"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_validation_error_messages() {
        assert!(ValidationError::EmptyTitle.to_string().contains("Title required"));
        assert!(ValidationError::InvalidDate("2024-13-01".to_string())
            .to_string()
            .contains("2024-13-01"));
        assert!(ValidationError::UnknownMood("meh".to_string())
            .to_string()
            .contains("confused"));
    }

    #[test]
    fn test_storage_error_from_sqlite() {
        let sqlite_error = rusqlite::Error::QueryReturnedNoRows;
        let storage_error: StorageError = sqlite_error.into();
        let app_error: AppError = storage_error.into();
        assert!(matches!(app_error, AppError::Storage(StorageError::Sqlite(_))));
    }

    #[test]
    fn test_image_error_too_large_message() {
        let error = ImageError::TooLarge {
            size: 2_000_000,
            limit: 1_048_576,
        };
        let message = error.to_string();
        assert!(message.contains("2000000"));
        assert!(message.contains("1048576"));
    }
}
