//! Constants used throughout the application.
//!
//! This module contains all constants used in the Happy Day journal, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "happyday";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "Track your moods and memories on a calendar";
/// Title shown above the calendar.
pub const APP_TITLE: &str = "Happy Day Journal";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for the data directory.
pub const ENV_VAR_HAPPYDAY_DIR: &str = "HAPPYDAY_DIR";
/// Environment variable selecting the storage backend.
pub const ENV_VAR_HAPPYDAY_STORAGE: &str = "HAPPYDAY_STORAGE";
/// Environment variable for the simulated authentication latency in milliseconds.
pub const ENV_VAR_HAPPYDAY_AUTH_LATENCY_MS: &str = "HAPPYDAY_AUTH_LATENCY_MS";
/// Environment variable for the first weekday of the calendar grid.
pub const ENV_VAR_HAPPYDAY_WEEK_START: &str = "HAPPYDAY_WEEK_START";
/// Environment variable bounding the longest side of an attached image.
pub const ENV_VAR_HAPPYDAY_IMAGE_MAX_DIMENSION: &str = "HAPPYDAY_IMAGE_MAX_DIMENSION";
/// Environment variable bounding the encoded size of an attached image.
pub const ENV_VAR_HAPPYDAY_IMAGE_MAX_BYTES: &str = "HAPPYDAY_IMAGE_MAX_BYTES";
/// Non-interactive password source, used by tests and scripts.
pub const ENV_VAR_HAPPYDAY_TEST_PASSWORD: &str = "HAPPYDAY_TEST_PASSWORD";
/// Non-interactive source for the replacement password in `passwd`.
pub const ENV_VAR_HAPPYDAY_TEST_NEW_PASSWORD: &str = "HAPPYDAY_TEST_NEW_PASSWORD";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory name for journal data within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".happyday";
/// Default simulated round-trip for login and register.
pub const DEFAULT_AUTH_LATENCY_MS: u64 = 1000;

/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Storage Layout
/// Slot holding the JSON-encoded active session.
pub const SESSION_KEY: &str = "user";
/// Prefix of the per-user slot holding the JSON-encoded entry list.
pub const EVENTS_KEY_PREFIX: &str = "events-";
/// File name of the SQLite database inside the data directory.
pub const SQLITE_FILENAME: &str = "happyday.db";
/// Sub-directory used by the file backend.
pub const FILE_STORE_SUBDIR: &str = "store";
/// File extension for values written by the file backend.
pub const FILE_STORE_EXTENSION: &str = "json";
/// Lock file guarding writes in the file backend.
pub const FILE_STORE_LOCK: &str = ".lock";
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Demo Account
/// The only username `login` accepts.
pub const DEMO_USERNAME: &str = "demo";
/// The only password `login` accepts.
pub const DEMO_PASSWORD: &str = "password";
/// Identifier of the demo user.
pub const DEMO_USER_ID: &str = "1";
/// Email address of the demo user.
pub const DEMO_EMAIL: &str = "demo@example.com";

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Date format string for compact date format (YYYYMMDD).
pub const DATE_FORMAT_COMPACT: &str = "%Y%m%d";
/// Month format accepted by `calendar --month`.
pub const MONTH_FORMAT: &str = "%Y-%m";
/// Format of the calendar heading, e.g. "October 2026".
pub const MONTH_TITLE_FORMAT: &str = "%B %Y";
/// Format of an entry's creation time on its card, e.g. "Jan 15, 2024, 2:30 PM".
pub const CREATED_AT_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";
/// Days per calendar row.
pub const DAYS_PER_WEEK: usize = 7;
/// Rows in every month grid.
pub const WEEKS_PER_GRID: usize = 6;

// Calendar View
/// Horizontal travel that turns a touch drag into a month change.
pub const SWIPE_THRESHOLD: f64 = 50.0;
/// Mood markers shown in one day cell before the overflow marker.
pub const MAX_MOODS_PER_CELL: usize = 3;

// Image Pipeline
/// Default bound on the longest side of an attached image, in pixels.
pub const DEFAULT_IMAGE_MAX_DIMENSION: u32 = 1920;
/// Default bound on the encoded image size, in bytes.
pub const DEFAULT_IMAGE_MAX_BYTES: usize = 1024 * 1024;
/// First JPEG quality tried when compressing.
pub const IMAGE_START_QUALITY: u8 = 80;
/// Lowest JPEG quality tried before giving up.
pub const IMAGE_MIN_QUALITY: u8 = 40;
/// Quality decrement between attempts.
pub const IMAGE_QUALITY_STEP: u8 = 10;

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "happyday";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
