//! The shared, observable session handle.
//!
//! Every part of the client that needs to know "who is signed in right
//! now" (the HTTP layer stamping bearer tokens, route guards, UI
//! surfaces) holds a [`SessionStore`] and either reads the current
//! value or subscribes to changes. Two stores over the same storage
//! behave like two browser tabs sharing localStorage: one signs in,
//! the other picks it up on [`reload`](SessionStore::reload).

use std::sync::Arc;
use tokio::sync::watch;

use crate::error::Result;
use crate::state::Session;
use crate::storage::SharedSessionStorage;

/// Shared session handle over a persistence backend.
#[derive(Clone)]
pub struct SessionStore {
    storage: SharedSessionStorage,
    tx: Arc<watch::Sender<Option<Session>>>,
}

impl SessionStore {
    /// Creates a store over the given backend, starting signed out
    /// until [`reload`](Self::reload) is called.
    #[must_use]
    pub fn new(storage: SharedSessionStorage) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            storage,
            tx: Arc::new(tx),
        }
    }

    /// The session as this handle currently knows it.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Watch for session changes. The receiver yields the current value
    /// immediately and every change after.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }

    /// Persist a new session and notify subscribers.
    pub async fn persist(&self, session: Session) -> Result<()> {
        self.storage.save(&session).await?;
        self.tx.send_replace(Some(session));
        Ok(())
    }

    /// Remove the persisted session and notify subscribers.
    pub async fn clear(&self) -> Result<()> {
        self.storage.clear().await?;
        self.tx.send_replace(None);
        Ok(())
    }

    /// Re-read the backend and publish whatever is there now.
    ///
    /// This is how a second handle on the same storage catches up with
    /// a sign-in or sign-out done elsewhere.
    pub async fn reload(&self) -> Result<Option<Session>> {
        let session = self.storage.load().await?;
        self.tx.send_replace(session.clone());
        Ok(session)
    }
}
