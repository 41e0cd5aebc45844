//! Two session handles over one storage behave like two browser tabs:
//! a sign-in done in one is visible to the other after a reload, and
//! subscribers on either handle observe the change.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::Utc;
use taroudant_domain::types::{Role, UserId};
use taroudant_session::{MemorySessionStore, Session, SessionStorage, SessionStore};

fn session(role: Role) -> Session {
    Session {
        token: "tok-123".to_owned(),
        user_id: UserId::new(5),
        role,
        full_name: "Aya".to_owned(),
        issued_at: Utc::now(),
    }
}

fn shared_storage() -> Arc<dyn SessionStorage> {
    Arc::new(MemorySessionStore::new())
}

#[tokio::test]
async fn sign_in_in_one_tab_is_picked_up_by_the_other() {
    let storage = shared_storage();
    let tab_a = SessionStore::new(Arc::clone(&storage));
    let tab_b = SessionStore::new(storage);

    tab_a.persist(session(Role::Tourist)).await.unwrap();

    // Tab B has not looked yet
    assert!(tab_b.current().is_none());

    let restored = tab_b.reload().await.unwrap();
    assert_eq!(restored.map(|s| s.token), Some("tok-123".to_owned()));
    assert!(tab_b.current().is_some());
}

#[tokio::test]
async fn sign_out_propagates_on_reload() {
    let storage = shared_storage();
    let tab_a = SessionStore::new(Arc::clone(&storage));
    let tab_b = SessionStore::new(storage);

    tab_a.persist(session(Role::Guide)).await.unwrap();
    tab_b.reload().await.unwrap();
    assert!(tab_b.current().is_some());

    tab_a.clear().await.unwrap();
    assert_eq!(tab_b.reload().await.unwrap(), None);
    assert!(tab_b.current().is_none());
}

#[tokio::test]
async fn subscribers_observe_reloads() {
    let storage = shared_storage();
    let tab_a = SessionStore::new(Arc::clone(&storage));
    let tab_b = SessionStore::new(storage);

    let mut watcher = tab_b.subscribe();
    assert_eq!(*watcher.borrow_and_update(), None);

    tab_a.persist(session(Role::Admin)).await.unwrap();
    tab_b.reload().await.unwrap();

    watcher.changed().await.unwrap();
    assert_eq!(
        watcher.borrow_and_update().as_ref().map(|s| s.role),
        Some(Role::Admin)
    );
}
