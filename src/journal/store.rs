//! The per-user entry collection.

use super::entry::{JournalEntry, NewEntry};
use crate::errors::{AppError, AppResult, AuthError, StorageError};
use crate::session::UserSession;
use crate::storage::{events_key, KeyValueStore};
use chrono::{NaiveDate, SubsecRound, Utc};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Ordered collection of the active user's journal entries.
///
/// The collection is mirrored to the `events-<userId>` slot: it is read once
/// when the owner changes and written in full after every mutation. A write
/// that fails leaves the in-memory collection as it was.
///
/// # Examples
///
/// ```
/// use happyday::journal::{EventStore, Mood, NewEntry};
/// use happyday::session::UserSession;
/// use happyday::storage::MemoryStore;
/// use chrono::NaiveDate;
/// use std::sync::Arc;
///
/// let mut store = EventStore::new(Arc::new(MemoryStore::new()));
/// let user = UserSession {
///     id: "1".to_string(),
///     username: "demo".to_string(),
///     email: "demo@example.com".to_string(),
/// };
/// store.load_for(Some(&user))?;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let mut form = NewEntry::blank(day);
/// form.title = "First snow".to_string();
/// let entry = store.add(form)?;
///
/// assert_eq!(store.entries_for_date(day), vec![&entry]);
/// # Ok::<(), happyday::AppError>(())
/// ```
pub struct EventStore {
    storage: Arc<dyn KeyValueStore>,
    owner: Option<String>,
    entries: Vec<JournalEntry>,
}

impl EventStore {
    /// Creates an empty store with no owner.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            owner: None,
            entries: Vec::new(),
        }
    }

    /// Id of the user whose collection is loaded.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Swaps in the collection of `session`'s user.
    ///
    /// With no session the collection is cleared. Loading the same user
    /// twice keeps the in-memory collection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be read or does not hold an
    /// entry list. The previous collection is kept in that case.
    pub fn load_for(&mut self, session: Option<&UserSession>) -> AppResult<()> {
        let Some(session) = session else {
            if self.owner.take().is_some() {
                debug!("Session ended, clearing entries");
            }
            self.entries.clear();
            return Ok(());
        };

        if self.owner.as_deref() == Some(session.id.as_str()) {
            return Ok(());
        }

        let key = events_key(&session.id);
        let entries = match self.storage.get(&key)? {
            Some(raw) => serde_json::from_str::<Vec<JournalEntry>>(&raw)
                .map_err(|source| StorageError::Corrupt { key, source })?,
            None => Vec::new(),
        };

        info!(
            "Loaded {} entries for user {}",
            entries.len(),
            session.id
        );
        self.owner = Some(session.id.clone());
        self.entries = entries;
        Ok(())
    }

    /// Appends a new entry with a fresh id and creation time.
    ///
    /// The store does not validate the fields; see `NewEntry::validate`.
    ///
    /// # Errors
    ///
    /// - `AuthError::NotAuthenticated` if no collection is loaded
    /// - `AppError::SaveFailed` if the collection cannot be written
    pub fn add(&mut self, fields: NewEntry) -> AppResult<JournalEntry> {
        let entry = JournalEntry {
            id: self.next_id(),
            date: fields.date,
            title: fields.title,
            description: fields.description,
            mood: fields.mood,
            image_url: fields.image_url,
            created_at: Utc::now().trunc_subsecs(3),
        };

        let mut next = self.entries.clone();
        next.push(entry.clone());
        self.commit(next)?;

        debug!("Added entry {} on {}", entry.id, entry.date);
        Ok(entry)
    }

    /// Replaces the mutable fields of the entry with `entry.id`.
    ///
    /// The stored `id` and `created_at` are kept whatever `entry` carries.
    ///
    /// # Errors
    ///
    /// - `AppError::EntryNotFound` if no entry has that id; nothing changes
    /// - `AuthError::NotAuthenticated` if no collection is loaded
    /// - `AppError::SaveFailed` if the collection cannot be written
    pub fn update(&mut self, entry: JournalEntry) -> AppResult<JournalEntry> {
        self.require_owner()?;
        let index = self
            .entries
            .iter()
            .position(|existing| existing.id == entry.id)
            .ok_or_else(|| AppError::EntryNotFound(entry.id.clone()))?;

        let mut next = self.entries.clone();
        next[index].apply(entry.to_new_entry());
        let updated = next[index].clone();
        self.commit(next)?;

        debug!("Updated entry {}", updated.id);
        Ok(updated)
    }

    /// Removes the entry with `id`. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// - `AuthError::NotAuthenticated` if no collection is loaded
    /// - `AppError::SaveFailed` if the collection cannot be written
    pub fn delete(&mut self, id: &str) -> AppResult<bool> {
        self.require_owner()?;
        if !self.entries.iter().any(|entry| entry.id == id) {
            debug!("Delete of unknown entry {} ignored", id);
            return Ok(false);
        }

        let next = self
            .entries
            .iter()
            .filter(|entry| entry.id != id)
            .cloned()
            .collect();
        self.commit(next)?;

        debug!("Deleted entry {}", id);
        Ok(true)
    }

    pub fn get(&self, id: &str) -> Option<&JournalEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Entries dated `date`, in insertion order.
    pub fn entries_for_date(&self, date: NaiveDate) -> Vec<&JournalEntry> {
        self.entries.iter().filter(|entry| entry.date == date).collect()
    }

    fn require_owner(&self) -> AppResult<&str> {
        self.owner
            .as_deref()
            .ok_or_else(|| AuthError::NotAuthenticated.into())
    }

    /// Writes `next` to storage and only then makes it the live collection.
    fn commit(&mut self, next: Vec<JournalEntry>) -> AppResult<()> {
        let key = events_key(self.require_owner()?);
        let raw = serde_json::to_string(&next).map_err(|source| {
            AppError::SaveFailed(StorageError::Corrupt {
                key: key.clone(),
                source,
            })
        })?;
        self.storage.set(&key, &raw).map_err(AppError::SaveFailed)?;
        self.entries = next;
        Ok(())
    }

    /// Time-ordered id that cannot collide with an existing entry.
    fn next_id(&self) -> String {
        loop {
            let id = Uuid::now_v7().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::Mood;
    use crate::storage::MemoryStore;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn user(id: &str) -> UserSession {
        UserSession {
            id: id.to_string(),
            username: format!("user{}", id),
            email: format!("user{}@example.com", id),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn form(date: NaiveDate, title: &str) -> NewEntry {
        NewEntry {
            date,
            title: title.to_string(),
            description: format!("about {}", title),
            mood: Mood::Happy,
            image_url: None,
        }
    }

    fn logged_in(storage: Arc<dyn KeyValueStore>, id: &str) -> EventStore {
        let mut store = EventStore::new(storage);
        store.load_for(Some(&user(id))).unwrap();
        store
    }

    /// Storage whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        failing: AtomicBool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StorageError::Io {
                    key: key.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded"),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_add_then_query_returns_entry_once() {
        let mut store = logged_in(Arc::new(MemoryStore::new()), "1");
        let entry = store.add(form(day(15), "Walk")).unwrap();

        let found = store.entries_for_date(day(15));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0], &entry);
        assert!(store.entries_for_date(day(16)).is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut store = logged_in(Arc::new(MemoryStore::new()), "1");
        let ids: HashSet<String> = (0..200)
            .map(|i| store.add(form(day(1), &format!("e{}", i))).unwrap().id)
            .collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_query_preserves_insertion_order() {
        let mut store = logged_in(Arc::new(MemoryStore::new()), "1");
        store.add(form(day(3), "first")).unwrap();
        store.add(form(day(4), "other day")).unwrap();
        store.add(form(day(3), "second")).unwrap();

        let titles: Vec<&str> = store
            .entries_for_date(day(3))
            .iter()
            .map(|entry| entry.title.as_str())
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn test_update_keeps_id_and_created_at() {
        let mut store = logged_in(Arc::new(MemoryStore::new()), "1");
        let original = store.add(form(day(15), "Walk")).unwrap();

        let mut edited = original.clone();
        edited.title = "Long walk".to_string();
        edited.mood = Mood::Excited;
        edited.created_at = Utc::now() + chrono::Duration::days(3);

        let updated = store.update(edited).unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);

        let found = store.entries_for_date(day(15));
        assert_eq!(found[0].title, "Long walk");
        assert_eq!(found[0].mood, Mood::Excited);
        assert_eq!(found[0].created_at, original.created_at);
    }

    #[test]
    fn test_update_can_move_entry_to_another_day() {
        let mut store = logged_in(Arc::new(MemoryStore::new()), "1");
        let mut entry = store.add(form(day(15), "Walk")).unwrap();
        entry.date = day(16);
        store.update(entry).unwrap();

        assert!(store.entries_for_date(day(15)).is_empty());
        assert_eq!(store.entries_for_date(day(16)).len(), 1);
    }

    #[test]
    fn test_update_missing_id_reports_not_found() {
        let mut store = logged_in(Arc::new(MemoryStore::new()), "1");
        let entry = store.add(form(day(15), "Walk")).unwrap();
        let before = store.entries().to_vec();

        let mut ghost = entry;
        ghost.id = "missing".to_string();
        match store.update(ghost) {
            Err(AppError::EntryNotFound(id)) => assert_eq!(id, "missing"),
            other => panic!("Expected EntryNotFound, got {:?}", other),
        }
        assert_eq!(store.entries(), before.as_slice());
    }

    #[test]
    fn test_delete_removes_and_ignores_unknown() {
        let mut store = logged_in(Arc::new(MemoryStore::new()), "1");
        let keep = store.add(form(day(15), "keep")).unwrap();
        let gone = store.add(form(day(15), "gone")).unwrap();

        assert!(store.delete(&gone.id).unwrap());
        assert!(!store.delete(&gone.id).unwrap());
        assert!(store.get(&gone.id).is_none());
        assert_eq!(store.entries_for_date(day(15)), vec![&keep]);
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut store = logged_in(storage.clone(), "1");
        let entry = store.add(form(day(15), "Walk")).unwrap();

        let raw = storage.get("events-1").unwrap().unwrap();
        let saved: Vec<JournalEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(saved, vec![entry.clone()]);

        store.delete(&entry.id).unwrap();
        let raw = storage.get("events-1").unwrap().unwrap();
        assert_eq!(raw, "[]");
    }

    #[test]
    fn test_reload_round_trip() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut store = logged_in(storage.clone(), "1");
        store.add(form(day(2), "a")).unwrap();
        store.add(form(day(1), "b")).unwrap();
        let mut with_image = form(day(2), "c");
        with_image.image_url = Some("data:image/jpeg;base64,AAAA".to_string());
        store.add(with_image).unwrap();

        let reloaded = logged_in(storage, "1");
        assert_eq!(reloaded.entries(), store.entries());
    }

    #[test]
    fn test_switching_users_swaps_collections() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        let mut store = logged_in(storage.clone(), "b");
        let b_entry = store.add(form(day(5), "b's entry")).unwrap();

        store.load_for(Some(&user("a"))).unwrap();
        assert!(store.is_empty());
        store.add(form(day(5), "a's entry")).unwrap();

        store.load_for(Some(&user("b"))).unwrap();
        assert_eq!(store.owner(), Some("b"));
        assert_eq!(store.entries(), &[b_entry]);
    }

    #[test]
    fn test_logged_out_store_is_empty_and_read_only() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut store = logged_in(storage, "1");
        let entry = store.add(form(day(15), "Walk")).unwrap();

        store.load_for(None).unwrap();
        assert!(store.is_empty());
        assert!(store.owner().is_none());
        assert!(matches!(
            store.add(form(day(15), "nope")),
            Err(AppError::Auth(AuthError::NotAuthenticated))
        ));
        assert!(matches!(
            store.delete(&entry.id),
            Err(AppError::Auth(AuthError::NotAuthenticated))
        ));
    }

    #[test]
    fn test_failed_save_leaves_collection_unchanged() {
        let flaky = Arc::new(FlakyStore::default());
        let mut store = logged_in(flaky.clone(), "1");
        let entry = store.add(form(day(15), "Walk")).unwrap();

        flaky.failing.store(true, Ordering::SeqCst);
        assert!(matches!(
            store.add(form(day(15), "Run")),
            Err(AppError::SaveFailed(_))
        ));
        assert!(matches!(store.delete(&entry.id), Err(AppError::SaveFailed(_))));
        assert_eq!(store.entries(), &[entry.clone()]);

        flaky.failing.store(false, Ordering::SeqCst);
        let reloaded = logged_in(flaky, "1");
        assert_eq!(reloaded.entries(), &[entry]);
    }

    #[test]
    fn test_corrupt_slot_is_reported() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        storage.set("events-1", "not json").unwrap();

        let mut store = EventStore::new(storage);
        let result = store.load_for(Some(&user("1")));
        assert!(matches!(
            result,
            Err(AppError::Storage(StorageError::Corrupt { .. }))
        ));
        assert!(store.owner().is_none());
    }
}
