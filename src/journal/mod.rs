//! Journal entries and the per-user store that holds them.
//!
//! - `entry`: the `JournalEntry`, `NewEntry` and `Mood` types
//! - `store`: the `EventStore` collection mirrored to key-value storage

pub mod entry;
pub mod store;

pub use entry::{JournalEntry, Mood, NewEntry};
pub use store::EventStore;
