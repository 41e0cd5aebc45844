//! End-to-end tour against a running backend.
//!
//! Restores any persisted session, loads the public catalog, and, when
//! `TAROUDANT_EMAIL`/`TAROUDANT_PASSWORD` are set, signs in and shows
//! what the route guards make of the resulting role.
//!
//! ```sh
//! TAROUDANT_API_URL=http://localhost:8080/api \
//! cargo run --example platform_tour
//! ```

use std::sync::Arc;

use anyhow::Result;
use taroudant_client::{ApiClient, ClientConfig};
use taroudant_core::environment::SystemClock;
use taroudant_domain::api::ListScope;
use taroudant_domain::catalog::{
    CatalogAction, CatalogEnvironment, CatalogReducer, CatalogState,
};
use taroudant_domain::entity::EntityKind;
use taroudant_domain::queue::Viewer;
use taroudant_domain::types::Actor;
use taroudant_runtime::Store;
use taroudant_session::{
    AccessGuard, FileSessionStore, SessionAction, SessionEnvironment, SessionReducer,
    SessionState, SessionStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(base_url = %config.base_url, "starting platform tour");

    let session_store = SessionStore::new(Arc::new(FileSessionStore::new()?));
    let client = ApiClient::new(&config, session_store.clone());
    let clock = Arc::new(SystemClock);

    // Session feature
    let session = Store::new(
        SessionState::new(),
        SessionReducer::new(),
        SessionEnvironment::new(Arc::new(client.clone()), session_store.clone(), clock),
    );
    session.send(SessionAction::Restore).await;

    if session_store.current().is_none() {
        if let (Ok(email), Ok(password)) = (
            std::env::var("TAROUDANT_EMAIL"),
            std::env::var("TAROUDANT_PASSWORD"),
        ) {
            session.send(SessionAction::Login { email, password }).await;
        }
    }

    let actor = session.state(SessionState::actor).await;
    match actor {
        Some(actor) => println!("signed in as user {} ({})", actor.id, actor.role),
        None => println!("browsing anonymously"),
    }

    for (guard, name) in [
        (AccessGuard::admin_only(), "admin dashboard"),
        (AccessGuard::guide_only(), "guide dashboard"),
        (AccessGuard::tourist_only(), "booking page"),
    ] {
        let session_snapshot = session_store.current();
        println!("  {name}: {:?}", guard.authorize(session_snapshot.as_ref()));
    }

    // Catalog feature
    let catalog = Store::new(
        CatalogState::new(),
        CatalogReducer::new(),
        CatalogEnvironment::new(Arc::new(client)),
    );
    let browsing_actor = actor.unwrap_or_else(|| {
        // Anonymous browsing uses the public scope, where the actor's
        // identity is never consulted
        Actor::new(taroudant_domain::types::UserId::new(0), taroudant_domain::Role::Tourist)
    });

    for kind in EntityKind::ALL {
        catalog
            .send(CatalogAction::Load {
                actor: browsing_actor,
                kind,
                scope: ListScope::Public,
            })
            .await;
    }

    let state = catalog.snapshot().await;
    if let Some(error) = &state.last_error {
        println!("catalog load incomplete: {error}");
    }
    let viewer = Viewer::from_actor(actor);
    for kind in EntityKind::ALL {
        let count = taroudant_domain::queue::visible(&state, viewer, kind).count();
        println!("{count:>4} visible {kind}(s)");
    }

    Ok(())
}
