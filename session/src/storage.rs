//! Pluggable session persistence.
//!
//! The client persists the session between runs the way a browser keeps
//! localStorage: one small JSON document. The file backend lives under
//! the platform data directory; the in-memory backend exists for tests
//! and for embedding the client where persistence is unwanted.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{Result, SessionError};
use crate::state::Session;

/// Where sessions are saved and restored from.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Read the persisted session, if one exists.
    async fn load(&self) -> Result<Option<Session>>;

    /// Persist the session, replacing any previous one.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Remove the persisted session.
    async fn clear(&self) -> Result<()>;
}

/// Shared handle to a session storage backend.
pub type SharedSessionStorage = Arc<dyn SessionStorage>;

// ============================================================================
// File backend
// ============================================================================

/// File-backed storage under the platform data directory.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Storage at the default location,
    /// `<data_dir>/taroudant/session.json`.
    pub fn new() -> Result<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| SessionError::Storage("no platform data directory".to_owned()))?;
        Ok(Self::at(base.join("taroudant").join("session.json")))
    }

    /// Storage at an explicit path.
    #[must_use]
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl SessionStorage for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let session = serde_json::from_slice(&bytes)
                    .map_err(|e| SessionError::Storage(e.to_string()))?;
                Ok(Some(session))
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::Storage(e.to_string())),
        }
    }

    async fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SessionError::Storage(e.to_string()))?;
        }
        let bytes =
            serde_json::to_vec_pretty(session).map_err(|e| SessionError::Storage(e.to_string()))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Storage(e.to_string())),
        }
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// In-memory storage for tests and ephemeral embeddings.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<Session>>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        *self.slot.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.lock().await = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taroudant_domain::types::{Role, UserId};

    fn session() -> Session {
        Session {
            token: "tok".to_owned(),
            user_id: UserId::new(5),
            role: Role::Tourist,
            full_name: "Aya".to_owned(),
            issued_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn memory_store_round_trips() {
        let store = MemorySessionStore::new();
        assert_eq!(store.load().await.unwrap(), None);

        let session = session();
        store.save(&session).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_round_trips() {
        let path = std::env::temp_dir()
            .join("taroudant-session-test")
            .join(format!("session-{}.json", std::process::id()));
        let store = FileSessionStore::at(path.clone());

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);

        let session = session();
        store.save(&session).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn clearing_a_missing_file_is_fine() {
        let store = FileSessionStore::at(std::env::temp_dir().join("taroudant-missing.json"));
        store.clear().await.unwrap();
        store.clear().await.unwrap();
    }
}
