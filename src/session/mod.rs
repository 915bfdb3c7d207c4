//! Simulated authentication and the active session.
//!
//! There is no credential store: `login` accepts exactly the demo account,
//! `register` fabricates a user, and `change_password` only checks the demo
//! password. The active session is persisted under the `user` key so it
//! survives restarts.

use crate::constants::{
    DEMO_EMAIL, DEMO_PASSWORD, DEMO_USERNAME, DEMO_USER_ID, SESSION_KEY,
};
use crate::errors::{AppResult, AuthError, StorageError};
use crate::storage::KeyValueStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The locally held record of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl UserSession {
    /// The account `login` accepts.
    pub fn demo() -> Self {
        Self {
            id: DEMO_USER_ID.to_string(),
            username: DEMO_USERNAME.to_string(),
            email: DEMO_EMAIL.to_string(),
        }
    }
}

/// Holds at most one active session.
///
/// # Examples
///
/// ```
/// use happyday::session::SessionStore;
/// use happyday::storage::MemoryStore;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let mut sessions = SessionStore::restore(Arc::new(MemoryStore::new()), Duration::ZERO);
/// let user = sessions.login("demo", "password").await?;
/// assert_eq!(user.username, "demo");
///
/// sessions.logout();
/// assert!(sessions.current().is_none());
/// # Ok::<(), happyday::AppError>(())
/// # }).unwrap();
/// ```
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    current: Option<UserSession>,
    latency: Duration,
}

impl SessionStore {
    /// Creates the store, picking up a session persisted by an earlier run.
    ///
    /// A record that cannot be read is logged and treated as logged out.
    pub fn restore(storage: Arc<dyn KeyValueStore>, latency: Duration) -> Self {
        let current = match Self::read_persisted(storage.as_ref()) {
            Ok(session) => session,
            Err(e) => {
                warn!("Ignoring unreadable session record: {}", e);
                None
            }
        };

        if let Some(session) = &current {
            info!("Restored session for {}", session.username);
        }

        Self {
            storage,
            current,
            latency,
        }
    }

    fn read_persisted(storage: &dyn KeyValueStore) -> Result<Option<UserSession>, StorageError> {
        match storage.get(SESSION_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StorageError::Corrupt {
                    key: SESSION_KEY.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    pub fn current(&self) -> Option<&UserSession> {
        self.current.as_ref()
    }

    /// Logs in with the demo credentials.
    ///
    /// Waits for the configured latency before answering either way.
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidCredentials` for any other username/password pair
    /// - `AppError::SaveFailed` if the session cannot be persisted
    pub async fn login(&mut self, username: &str, password: &str) -> AppResult<UserSession> {
        let session = self.authenticate(username, password).await?;
        self.activate(session)
    }

    /// Checks the demo credentials without touching the active session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for any other pair.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<UserSession> {
        self.simulate_round_trip().await;

        if username != DEMO_USERNAME || password != DEMO_PASSWORD {
            debug!("Rejected login for {}", username);
            return Err(AuthError::InvalidCredentials.into());
        }
        Ok(UserSession::demo())
    }

    /// Registers a new local user and logs them in.
    ///
    /// # Errors
    ///
    /// Returns `AppError::SaveFailed` if the session cannot be persisted.
    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<UserSession> {
        let session = self.create_account(username, email, password).await;
        self.activate(session)
    }

    /// Fabricates a user record without touching the active session.
    ///
    /// Nothing is checked and the password is discarded; the id is the
    /// current time in milliseconds.
    pub async fn create_account(&self, username: &str, email: &str, _password: &str) -> UserSession {
        self.simulate_round_trip().await;

        UserSession {
            id: Utc::now().timestamp_millis().to_string(),
            username: username.to_string(),
            email: email.to_string(),
        }
    }

    /// Checks a password change request.
    ///
    /// Only the demo user with the demo password passes; nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordChangeRejected` otherwise, including when
    /// nobody is logged in.
    pub async fn change_password(&self, current: &str, _new: &str) -> AppResult<()> {
        self.simulate_round_trip().await;

        let is_demo = self
            .current
            .as_ref()
            .is_some_and(|session| session.username == DEMO_USERNAME);
        if !is_demo || current != DEMO_PASSWORD {
            return Err(AuthError::PasswordChangeRejected.into());
        }

        info!("Password change accepted");
        Ok(())
    }

    /// Ends the session. Always succeeds.
    pub fn logout(&mut self) {
        if let Some(session) = self.current.take() {
            info!("Logged out {}", session.username);
        }
        if let Err(e) = self.storage.remove(SESSION_KEY) {
            warn!("Failed to remove persisted session: {}", e);
        }
    }

    /// Persists `session` and makes it the active one.
    ///
    /// # Errors
    ///
    /// Returns `AppError::SaveFailed` if the record cannot be written; the
    /// previous session stays active in that case.
    pub fn activate(&mut self, session: UserSession) -> AppResult<UserSession> {
        let raw = serde_json::to_string(&session).map_err(|source| {
            crate::errors::AppError::SaveFailed(StorageError::Corrupt {
                key: SESSION_KEY.to_string(),
                source,
            })
        })?;
        self.storage
            .set(SESSION_KEY, &raw)
            .map_err(crate::errors::AppError::SaveFailed)?;

        info!("Session started for {}", session.username);
        self.current = Some(session.clone());
        Ok(session)
    }

    async fn simulate_round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::storage::MemoryStore;
    use std::time::Instant;

    fn fresh() -> (Arc<dyn KeyValueStore>, SessionStore) {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let sessions = SessionStore::restore(storage.clone(), Duration::ZERO);
        (storage, sessions)
    }

    #[tokio::test]
    async fn test_demo_login_succeeds() {
        let (storage, mut sessions) = fresh();
        let session = sessions.login("demo", "password").await.unwrap();

        assert_eq!(session, UserSession::demo());
        assert_eq!(sessions.current(), Some(&session));
        assert!(storage.get(SESSION_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_other_credentials_fail() {
        let (storage, mut sessions) = fresh();
        for (user, pass) in [("demo", "Password"), ("Demo", "password"), ("", ""), ("bob", "password")] {
            let result = sessions.login(user, pass).await;
            assert!(matches!(
                result,
                Err(AppError::Auth(AuthError::InvalidCredentials))
            ));
        }
        assert!(sessions.current().is_none());
        assert!(storage.get(SESSION_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authenticate_leaves_active_session_alone() {
        let (storage, mut sessions) = fresh();
        let alice = sessions
            .register("alice", "alice@example.com", "pw")
            .await
            .unwrap();

        let demo = sessions.authenticate("demo", "password").await.unwrap();
        assert_eq!(demo, UserSession::demo());
        assert_eq!(sessions.current(), Some(&alice));

        let restored = SessionStore::restore(storage, Duration::ZERO);
        assert_eq!(restored.current(), Some(&alice));
    }

    #[tokio::test]
    async fn test_register_fabricates_user() {
        let (_storage, mut sessions) = fresh();
        let session = sessions
            .register("alice", "alice@example.com", "whatever")
            .await
            .unwrap();

        assert_eq!(session.username, "alice");
        assert_eq!(session.email, "alice@example.com");
        assert!(session.id.parse::<i64>().is_ok());
        assert_ne!(session.id, DEMO_USER_ID);
    }

    #[tokio::test]
    async fn test_session_is_restored() {
        let (storage, mut sessions) = fresh();
        sessions.login("demo", "password").await.unwrap();

        let restored = SessionStore::restore(storage.clone(), Duration::ZERO);
        assert_eq!(restored.current(), Some(&UserSession::demo()));

        sessions.logout();
        let restored = SessionStore::restore(storage, Duration::ZERO);
        assert!(restored.current().is_none());
    }

    #[test]
    fn test_corrupt_session_record_means_logged_out() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        storage.set(SESSION_KEY, "{broken").unwrap();

        let sessions = SessionStore::restore(storage, Duration::ZERO);
        assert!(sessions.current().is_none());
    }

    #[tokio::test]
    async fn test_change_password_rules() {
        let (_storage, mut sessions) = fresh();
        assert!(matches!(
            sessions.change_password("password", "new").await,
            Err(AppError::Auth(AuthError::PasswordChangeRejected))
        ));

        sessions.login("demo", "password").await.unwrap();
        assert!(sessions.change_password("password", "new").await.is_ok());
        assert!(matches!(
            sessions.change_password("wrong", "new").await,
            Err(AppError::Auth(AuthError::PasswordChangeRejected))
        ));

        // Nothing was stored: the old password still logs in.
        sessions.logout();
        assert!(sessions.login("demo", "password").await.is_ok());

        sessions.logout();
        sessions.register("alice", "a@example.com", "pw").await.unwrap();
        assert!(matches!(
            sessions.change_password("password", "new").await,
            Err(AppError::Auth(AuthError::PasswordChangeRejected))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_applies_to_failures_too() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut sessions = SessionStore::restore(storage, Duration::from_millis(1000));

        let started = tokio::time::Instant::now();
        let result = sessions.login("demo", "nope").await;
        assert!(result.is_err());
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_zero_latency_is_immediate() {
        let (_storage, mut sessions) = fresh();
        let started = Instant::now();
        sessions.login("demo", "password").await.unwrap();
        assert!(started.elapsed() < Duration::from_millis(500));
    }
}
