//! The application facade.
//!
//! `JournalApp` owns the session store, the event store and the notifier
//! for one process. Every entry operation goes through it, and it refuses
//! them unless the loaded collection belongs to the logged-in user.

use crate::config::Config;
use crate::errors::{AppError, AppResult, AuthError};
use crate::image::{encode_image_file, ImageOptions};
use crate::journal::{EventStore, JournalEntry, NewEntry};
use crate::notify::{self, Notice, Notifier};
use crate::session::{SessionStore, UserSession};
use crate::storage::{self, KeyValueStore};
use chrono::NaiveDate;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct JournalApp {
    sessions: SessionStore,
    events: EventStore,
    notifier: Box<dyn Notifier>,
    image_options: ImageOptions,
    load_failure: Option<String>,
}

impl JournalApp {
    /// Opens the configured storage backend and restores the last session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be opened.
    pub fn open(config: &Config, notifier: Box<dyn Notifier>) -> AppResult<Self> {
        let storage = storage::open(config)?;
        let mut app = Self::new(storage, config.auth_latency, notifier);
        app.image_options = config.image.clone();
        Ok(app)
    }

    /// Builds the facade over an already opened backend.
    ///
    /// A restored session whose entries cannot be read stays logged in;
    /// entry operations report the failure until a later load succeeds.
    ///
    /// # Examples
    ///
    /// ```
    /// use happyday::app::JournalApp;
    /// use happyday::notify::TracingNotifier;
    /// use happyday::storage::MemoryStore;
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let app = JournalApp::new(
    ///     Arc::new(MemoryStore::new()),
    ///     Duration::ZERO,
    ///     Box::new(TracingNotifier),
    /// );
    /// assert!(app.current_user().is_none());
    /// assert!(app.events().is_err());
    /// ```
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        auth_latency: Duration,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let sessions = SessionStore::restore(storage.clone(), auth_latency);
        let mut events = EventStore::new(storage);
        let load_failure = match events.load_for(sessions.current()) {
            Ok(()) => None,
            Err(e) => {
                warn!("Entries of the restored session could not be loaded: {}", e);
                Some(e.to_string())
            }
        };

        Self {
            sessions,
            events,
            notifier,
            image_options: ImageOptions::default(),
            load_failure,
        }
    }

    pub fn current_user(&self) -> Option<&UserSession> {
        self.sessions.current()
    }

    /// Logs in and switches to that user's entries.
    ///
    /// The session only changes once the user's collection has been
    /// loaded, so a failed load leaves the previous user fully in place.
    pub async fn login(&mut self, username: &str, password: &str) -> AppResult<UserSession> {
        let result = match self.sessions.authenticate(username, password).await {
            Ok(session) => self.switch_to(session),
            Err(e) => Err(e),
        };

        match result {
            Ok(session) => {
                self.notify(Notice::success(
                    notify::LOGIN_SUCCESSFUL,
                    format!("Welcome back, {}!", session.username),
                ));
                Ok(session)
            }
            Err(e) => {
                self.notify(Notice::error(notify::LOGIN_FAILED, e.to_string()));
                Err(e)
            }
        }
    }

    /// Creates an account, then switches to it the same way `login` does.
    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<UserSession> {
        let account = self
            .sessions
            .create_account(username, email, password)
            .await;
        let session = self.switch_to(account)?;
        self.notify(Notice::success(
            notify::REGISTRATION_SUCCESSFUL,
            format!("Welcome, {}!", session.username),
        ));
        Ok(session)
    }

    /// Loads `session`'s collection, then makes it the active session.
    fn switch_to(&mut self, session: UserSession) -> AppResult<UserSession> {
        self.events.load_for(Some(&session))?;

        match self.sessions.activate(session) {
            Ok(session) => {
                self.load_failure = None;
                Ok(session)
            }
            Err(e) => {
                // The previous session is still active; put its entries back.
                if let Err(reload) = self.events.load_for(self.sessions.current()) {
                    warn!("Failed to reload entries of the previous session: {}", reload);
                    self.load_failure = Some(reload.to_string());
                }
                Err(e)
            }
        }
    }

    pub fn logout(&mut self) {
        self.sessions.logout();
        self.load_failure = None;
        if let Err(e) = self.events.load_for(None) {
            warn!("Failed to clear entries on logout: {}", e);
        }
        self.notify(Notice::success(notify::LOGGED_OUT, "See you tomorrow."));
    }

    pub async fn change_password(&mut self, current: &str, new: &str) -> AppResult<()> {
        self.require_session()?;
        match self.sessions.change_password(current, new).await {
            Ok(()) => {
                self.notify(Notice::success(notify::PASSWORD_CHANGED, ""));
                Ok(())
            }
            Err(e) => {
                self.notify(Notice::error(notify::PASSWORD_CHANGE_FAILED, e.to_string()));
                Err(e)
            }
        }
    }

    /// Read access to the active user's entries.
    ///
    /// # Errors
    ///
    /// - `AuthError::NotAuthenticated` when logged out
    /// - `AppError::EntriesUnavailable` when the user's entries could not be loaded
    pub fn events(&self) -> AppResult<&EventStore> {
        self.require_collection()?;
        Ok(&self.events)
    }

    pub fn entries_on(&self, date: NaiveDate) -> AppResult<Vec<&JournalEntry>> {
        Ok(self.events()?.entries_for_date(date))
    }

    pub fn entry(&self, id: &str) -> AppResult<&JournalEntry> {
        self.events()?
            .get(id)
            .ok_or_else(|| AppError::EntryNotFound(id.to_string()))
    }

    /// Validates and saves a new entry.
    pub fn add_entry(&mut self, fields: NewEntry) -> AppResult<JournalEntry> {
        self.reload_collection()?;
        self.validate(&fields)?;

        let result = self.events.add(fields);
        self.report(result, notify::EVENT_ADDED, |entry| entry.title.clone())
    }

    /// Validates and saves changes to an existing entry.
    pub fn update_entry(&mut self, entry: JournalEntry) -> AppResult<JournalEntry> {
        self.reload_collection()?;
        self.validate(&entry.to_new_entry())?;

        let result = self.events.update(entry);
        self.report(result, notify::EVENT_UPDATED, |entry| entry.title.clone())
    }

    /// Deletes an entry; `false` when the id was unknown.
    pub fn delete_entry(&mut self, id: &str) -> AppResult<bool> {
        self.reload_collection()?;

        let result = self.events.delete(id);
        match result {
            Ok(false) => {
                debug!("Nothing to delete for {}", id);
                Ok(false)
            }
            other => self.report(other, notify::EVENT_DELETED, |_| String::new()),
        }
    }

    /// Compresses an image file into a `data:` URL for an entry.
    pub fn attach_image(&self, path: &Path) -> AppResult<String> {
        encode_image_file(path, &self.image_options).map_err(|e| {
            self.notify(Notice::error(notify::UPLOAD_FAILED, e.to_string()));
            e
        })
    }

    fn require_session(&self) -> AppResult<&UserSession> {
        self.sessions
            .current()
            .ok_or_else(|| AuthError::NotAuthenticated.into())
    }

    /// Succeeds only when the loaded collection is the logged-in user's.
    fn require_collection(&self) -> AppResult<()> {
        let session = self.require_session()?;
        if self.events.owner() == Some(session.id.as_str()) {
            return Ok(());
        }

        Err(AppError::EntriesUnavailable {
            user: session.id.clone(),
            reason: self
                .load_failure
                .clone()
                .unwrap_or_else(|| "entries are not loaded".to_string()),
        })
    }

    /// Retries a failed load before a mutation, then checks ownership.
    fn reload_collection(&mut self) -> AppResult<()> {
        let session = self.require_session()?.clone();
        if self.events.owner() != Some(session.id.as_str()) {
            match self.events.load_for(Some(&session)) {
                Ok(()) => self.load_failure = None,
                Err(e) => {
                    self.load_failure = Some(e.to_string());
                    return Err(e);
                }
            }
        }
        self.require_collection()
    }

    fn validate(&self, fields: &NewEntry) -> AppResult<()> {
        fields.validate().map_err(|e| {
            self.notify(Notice::error(notify::TITLE_REQUIRED, e.to_string()));
            AppError::from(e)
        })
    }

    fn report<T>(
        &self,
        result: AppResult<T>,
        success_title: &str,
        describe: impl FnOnce(&T) -> String,
    ) -> AppResult<T> {
        match &result {
            Ok(value) => self.notify(Notice::success(success_title, describe(value))),
            Err(e @ AppError::SaveFailed(_)) => {
                self.notify(Notice::error(notify::COULD_NOT_SAVE, e.to_string()))
            }
            Err(_) => {}
        }
        result
    }

    fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }
}
