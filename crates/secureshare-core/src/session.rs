//! Session state and persistence.
//!
//! The client holds exactly one session: an opaque bearer token plus the
//! user profile it was issued for, persisted together and cleared together.
//! `SessionHandle` is the process-wide cache; `SessionStorage` is the
//! durable side (a JSON file in the real client, memory in tests).

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::User;

/// The durable token + profile pair. Never persisted partially.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: User,
}

/// Lifecycle of the client session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Storage has not been checked yet.
    Unknown,
    /// No valid token.
    Anonymous,
    /// A token is cached for this user. Optimistic: validity is only
    /// discovered when a request fails with 401.
    Authenticated(User),
}

/// Durable storage for the session pair.
pub trait SessionStorage: Send + Sync {
    /// `Ok(None)` when nothing is stored. Malformed content is an error so
    /// the caller can wipe it.
    fn load(&self) -> Result<Option<StoredSession>, CoreError>;
    fn save(&self, session: &StoredSession) -> Result<(), CoreError>;
    /// Idempotent; clearing absent storage succeeds.
    fn clear(&self) -> Result<(), CoreError>;
}

/// JSON file storage, the CLI's stand-in for the browser's localStorage.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<StoredSession>, CoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let session: StoredSession = serde_json::from_str(&raw)?;
        if session.token.is_empty() {
            return Err(CoreError::InvalidSession("empty token".to_string()));
        }
        Ok(Some(session))
    }

    fn save(&self, session: &StoredSession) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    inner: Mutex<Option<StoredSession>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<StoredSession>, CoreError> {
        Ok(lock_unpoisoned(&self.inner).clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), CoreError> {
        *lock_unpoisoned(&self.inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *lock_unpoisoned(&self.inner) = None;
        Ok(())
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory cache behind the handle.
#[derive(Debug, Clone)]
enum Cached {
    Unknown,
    Anonymous,
    Authenticated(StoredSession),
}

/// Process-wide session cache over a storage backend.
///
/// Cheap to clone; all clones share the same cache. Reads are snapshot
/// reads: a concurrent forced logout between a read and the request it
/// feeds is resolved server-side (the request fails with 401).
#[derive(Clone)]
pub struct SessionHandle {
    cached: Arc<RwLock<Cached>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionHandle {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            cached: Arc::new(RwLock::new(Cached::Unknown)),
            storage,
        }
    }

    /// Read durable storage once and settle the `Unknown` state.
    ///
    /// A well-formed stored pair authenticates optimistically with no
    /// network round trip; staleness is discovered lazily by the first
    /// request the server rejects. Malformed or partial storage is wiped
    /// and the state becomes `Anonymous`.
    pub fn initialize(&self) -> SessionState {
        let cached = match self.storage.load() {
            Ok(Some(session)) => Cached::Authenticated(session),
            Ok(None) => Cached::Anonymous,
            Err(err) => {
                tracing::warn!(error = %err, "discarding malformed session storage");
                if let Err(err) = self.storage.clear() {
                    tracing::warn!(error = %err, "failed to clear session storage");
                }
                Cached::Anonymous
            }
        };
        let state = state_of(&cached);
        *write_unpoisoned(&self.cached) = cached;
        state
    }

    /// Persist and cache a fresh session (login/register success path).
    pub fn establish(&self, session: StoredSession) -> Result<(), CoreError> {
        self.storage.save(&session)?;
        *write_unpoisoned(&self.cached) = Cached::Authenticated(session);
        Ok(())
    }

    /// Snapshot of the cached bearer token. No storage access.
    pub fn token(&self) -> Option<String> {
        match &*read_unpoisoned(&self.cached) {
            Cached::Authenticated(session) => Some(session.token.clone()),
            _ => None,
        }
    }

    /// Wipe storage and cache. Idempotent.
    ///
    /// Returns `true` only for the call that actually tore down a live
    /// session, so the forced-logout hook can fire exactly once even when
    /// several in-flight requests all observe a 401.
    pub fn clear(&self) -> bool {
        let mut cached = write_unpoisoned(&self.cached);
        let was_live = matches!(*cached, Cached::Authenticated(_));
        *cached = Cached::Anonymous;
        drop(cached);

        if let Err(err) = self.storage.clear() {
            tracing::warn!(error = %err, "failed to clear session storage");
        }
        was_live
    }

    pub fn state(&self) -> SessionState {
        state_of(&read_unpoisoned(&self.cached))
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*read_unpoisoned(&self.cached), Cached::Authenticated(_))
    }

    pub fn current_user(&self) -> Option<User> {
        match &*read_unpoisoned(&self.cached) {
            Cached::Authenticated(session) => Some(session.user.clone()),
            _ => None,
        }
    }
}

fn state_of(cached: &Cached) -> SessionState {
    match cached {
        Cached::Unknown => SessionState::Unknown,
        Cached::Anonymous => SessionState::Anonymous,
        Cached::Authenticated(session) => SessionState::Authenticated(session.user.clone()),
    }
}

fn read_unpoisoned<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_unpoisoned<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: "u1".to_string(),
            email: "user@example.com".to_string(),
            name: Some("Test User".to_string()),
        }
    }

    fn memory_handle() -> SessionHandle {
        SessionHandle::new(Arc::new(MemorySessionStorage::new()))
    }

    #[test]
    fn starts_unknown_then_anonymous_on_empty_storage() {
        let handle = memory_handle();
        assert_eq!(handle.state(), SessionState::Unknown);
        assert_eq!(handle.initialize(), SessionState::Anonymous);
        assert!(!handle.is_authenticated());
        assert!(handle.token().is_none());
    }

    #[test]
    fn establish_authenticates_and_persists() {
        let handle = memory_handle();
        handle.initialize();

        handle
            .establish(StoredSession {
                token: "tok-1".to_string(),
                user: test_user(),
            })
            .unwrap();

        assert!(handle.is_authenticated());
        assert_eq!(handle.token().as_deref(), Some("tok-1"));
        assert_eq!(handle.current_user().unwrap().email, "user@example.com");
    }

    #[test]
    fn reload_restores_session_without_network() {
        let storage = Arc::new(MemorySessionStorage::new());
        let first = SessionHandle::new(storage.clone());
        first
            .establish(StoredSession {
                token: "tok-1".to_string(),
                user: test_user(),
            })
            .unwrap();

        // A second handle over the same storage models a process restart.
        let second = SessionHandle::new(storage);
        assert_eq!(
            second.initialize(),
            SessionState::Authenticated(test_user())
        );
        assert_eq!(second.token().as_deref(), Some("tok-1"));
    }

    #[test]
    fn clear_is_idempotent_and_reports_liveness_once() {
        let handle = memory_handle();
        handle.initialize();
        assert!(!handle.clear(), "clearing an anonymous session is a no-op");

        handle
            .establish(StoredSession {
                token: "tok-1".to_string(),
                user: test_user(),
            })
            .unwrap();

        assert!(handle.clear(), "first clear tears down the live session");
        assert!(!handle.clear(), "second clear reports nothing to tear down");
        assert!(!handle.is_authenticated());
        assert!(handle.token().is_none());
    }

    #[test]
    fn authenticated_iff_last_transition_was_login_like() {
        let handle = memory_handle();
        handle.initialize();
        assert!(!handle.is_authenticated());

        let session = StoredSession {
            token: "tok-1".to_string(),
            user: test_user(),
        };
        handle.establish(session.clone()).unwrap();
        assert!(handle.is_authenticated());

        handle.clear();
        assert!(!handle.is_authenticated());

        handle.establish(session).unwrap();
        assert!(handle.is_authenticated());
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("nested").join("session.json"));

        assert!(storage.load().unwrap().is_none());
        storage
            .save(&StoredSession {
                token: "tok-1".to_string(),
                user: test_user(),
            })
            .unwrap();

        let loaded = storage.load().unwrap().unwrap();
        assert_eq!(loaded.token, "tok-1");
        assert_eq!(loaded.user, test_user());

        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
        // clearing again succeeds
        storage.clear().unwrap();
    }

    #[test]
    fn malformed_file_is_wiped_on_initialize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let handle = SessionHandle::new(Arc::new(FileSessionStorage::new(path.clone())));
        assert_eq!(handle.initialize(), SessionState::Anonymous);
        assert!(!path.exists(), "partial storage must be cleared");
    }

    #[test]
    fn empty_token_counts_as_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            serde_json::json!({
                "token": "",
                "user": { "id": "u1", "email": "user@example.com", "name": null }
            })
            .to_string(),
        )
        .unwrap();

        let handle = SessionHandle::new(Arc::new(FileSessionStorage::new(path)));
        assert_eq!(handle.initialize(), SessionState::Anonymous);
    }
}
