//! Local snapshot storage.
//!
//! Each store persists a JSON snapshot of its state under its own namespace.
//! Snapshots are written whole on every mutation and restored on load.

mod file;
mod memory;

pub use file::FileSnapshotStorage;
pub use memory::MemorySnapshotStorage;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::{AuthError, AuthResult, AuthSession, SessionPersistence};
use crate::error::Result;

/// Namespaces of the persisted snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    AuthSession,
    AppPreferences,
    Favorites,
    PasswordVault,
    ToolHistory,
}

impl Namespace {
    pub const ALL: [Self; 5] = [
        Self::AuthSession,
        Self::AppPreferences,
        Self::Favorites,
        Self::PasswordVault,
        Self::ToolHistory,
    ];

    /// Storage key; also used as the snapshot file stem.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::AuthSession => "auth-session",
            Self::AppPreferences => "app-preferences",
            Self::Favorites => "favorites",
            Self::PasswordVault => "password-vault",
            Self::ToolHistory => "tool-history",
        }
    }
}

/// Raw key/value access to persisted snapshots.
pub trait SnapshotStorage: Send + Sync {
    /// Read the raw snapshot, `None` if nothing has been written yet.
    fn read(&self, namespace: Namespace) -> Result<Option<String>>;

    /// Replace the snapshot.
    fn write(&self, namespace: Namespace, contents: &str) -> Result<()>;

    /// Remove the snapshot; removing a missing snapshot is not an error.
    fn remove(&self, namespace: Namespace) -> Result<()>;
}

/// Load and decode a snapshot.
///
/// Missing snapshots yield `T::default()`. Corrupt snapshots are logged and
/// also yield the default so one bad file never blocks startup.
pub fn load_snapshot<T>(storage: &dyn SnapshotStorage, namespace: Namespace) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = storage.read(namespace)? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(error) => {
            tracing::warn!(
                "Discarding unreadable {} snapshot: {}",
                namespace.key(),
                error
            );
            Ok(T::default())
        }
    }
}

/// Encode and write a snapshot.
pub fn save_snapshot<T>(storage: &dyn SnapshotStorage, namespace: Namespace, value: &T) -> Result<()>
where
    T: Serialize,
{
    let raw = serde_json::to_string(value)?;
    storage.write(namespace, &raw)
}

/// Session persistence backed by the `auth-session` snapshot.
#[derive(Clone)]
pub struct SnapshotSessionStore<S> {
    storage: S,
}

impl<S> SnapshotSessionStore<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }
}

impl<S> SessionPersistence for SnapshotSessionStore<S>
where
    S: SnapshotStorage + Clone + 'static,
{
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let raw = self
            .storage
            .read(Namespace::AuthSession)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        self.storage
            .write(Namespace::AuthSession, &raw)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }

    fn clear_session(&self) -> AuthResult<()> {
        self.storage
            .remove(Namespace::AuthSession)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;
    use crate::models::Preferences;

    #[test]
    fn namespace_keys_are_distinct() {
        let keys = Namespace::ALL.map(Namespace::key);
        for (index, key) in keys.iter().enumerate() {
            assert!(!keys[index + 1..].contains(key));
        }
    }

    #[test]
    fn missing_snapshot_loads_default() {
        let storage = MemorySnapshotStorage::default();
        let loaded: Preferences = load_snapshot(&storage, Namespace::AppPreferences).unwrap();
        assert_eq!(loaded, Preferences::default());
    }

    #[test]
    fn corrupt_snapshot_loads_default() {
        let storage = MemorySnapshotStorage::default();
        storage.write(Namespace::Favorites, "{not json").unwrap();
        let loaded: Vec<String> = load_snapshot(&storage, Namespace::Favorites).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn session_store_roundtrip_and_clear() {
        let store = SnapshotSessionStore::new(MemorySnapshotStorage::default());
        assert!(store.load_session().unwrap().is_none());

        let session = AuthSession {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: 1_700_000_000,
            user: AuthUser {
                id: "user-1".to_string(),
                email: Some("user@example.com".to_string()),
            },
        };
        store.save_session(&session).unwrap();
        assert_eq!(store.load_session().unwrap(), Some(session));

        store.clear_session().unwrap();
        assert!(store.load_session().unwrap().is_none());
    }
}
