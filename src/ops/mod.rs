//! User-facing operations behind the CLI commands.
//!
//! Each operation works through a `JournalApp` and returns the text to
//! print, so the binary only has to parse arguments and write output.

pub mod auth;
pub mod calendar;
pub mod entries;

pub use auth::{change_password, login, logout, register, whoami};
pub use calendar::{show_calendar, CalendarRequest};
pub use entries::{add_entry, delete_entry, edit_entry, list_entries, EntryEdit, ImageChange};
