/*!
# Happy Day

Happy Day is a mood journal laid out on a calendar. Each day can hold any
number of short entries, each tagged with a mood and optionally an image.

## Core Features

- Month grid with overflow days from the neighbouring months
- Per-day entries with title, description, mood and an inline image
- A simulated login with a single demo account plus local registration
- Per-user collections persisted in SQLite or plain JSON files

## Architecture

- `calendar`: Grid generation, month arithmetic and the navigation state
- `journal`: Entry types and the per-user `EventStore`
- `session`: The simulated authentication layer
- `storage`: The `KeyValueStore` interface and its backends
- `app`: The `JournalApp` facade tying sessions, entries and notices together
- `image`: Compression of attached images into `data:` URLs
- `notify`: Success and failure notices
- `render`: Text rendering of the grid and of entries
- `ops`: The operations behind each CLI command
- `cli`, `config`, `constants`, `errors`: The usual plumbing

## Usage Example

```rust,no_run
use happyday::app::JournalApp;
use happyday::journal::NewEntry;
use happyday::notify::TracingNotifier;
use happyday::Config;
use chrono::Local;

#[tokio::main(flavor = "current_thread")]
async fn main() -> happyday::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let mut app = JournalApp::open(&config, Box::new(TracingNotifier))?;
    app.login("demo", "password").await?;

    let mut entry = NewEntry::blank(Local::now().date_naive());
    entry.title = "Finally fixed the bike".to_string();
    app.add_entry(entry)?;
    Ok(())
}
```
*/

/// The application facade
pub mod app;
/// Month grids and calendar navigation
pub mod calendar;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Error types and utilities for error handling
pub mod errors;
/// Image compression for attachments
pub mod image;
/// Journal entries and the event store
pub mod journal;
/// User notices
pub mod notify;
/// User-facing operations
pub mod ops;
/// Text rendering
pub mod render;
/// Simulated authentication
pub mod session;
/// Key-value persistence
pub mod storage;

// Re-export important types for convenience
pub use app::JournalApp;
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
