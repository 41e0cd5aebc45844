//! Full lifecycle flows driven through the store runtime against an
//! in-memory backend that enforces the same contract the real server
//! does: role-stamped creation, ACTIVE-only booking, no past dates,
//! own-only cancellation, terminal states.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use taroudant_domain::api::{
    BookingRequest, CatalogApi, ListScope, ReservationApi,
};
use taroudant_domain::catalog::{
    CatalogAction, CatalogEnvironment, CatalogReducer, CatalogState,
};
use taroudant_domain::entity::{
    Activity, ActivityDraft, ActivityId, Entity, EntityDraft, EntityKey, EntityKind,
};
use taroudant_domain::error::{LifecycleError, Result};
use taroudant_domain::{queue, rules};
use taroudant_domain::reservation::{
    ReservationAction, ReservationEnvironment, ReservationReducer, ReservationState,
};
use taroudant_domain::types::{
    Actor, BookingRef, EntityStatus, Reservation, ReservationId, ReservationStatus, Role, UserId,
};
use taroudant_runtime::Store;
use taroudant_testing::test_clock;

const ADMIN: Actor = Actor::new(UserId::new(1), Role::Admin);
const GUIDE: Actor = Actor::new(UserId::new(7), Role::Guide);
const TOURIST: Actor = Actor::new(UserId::new(5), Role::Tourist);

/// In-memory stand-in for the backend. Tracks who is "signed in" the
/// way a bearer token would, and re-enforces every server-side rule.
struct FakeBackend {
    caller: Mutex<Actor>,
    entities: Mutex<HashMap<EntityKey, Entity>>,
    reservations: Mutex<HashMap<ReservationId, Reservation>>,
    next_id: AtomicI64,
    today: NaiveDate,
}

impl FakeBackend {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            caller: Mutex::new(TOURIST),
            entities: Mutex::new(HashMap::new()),
            reservations: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            // Matches the frozen test clock
            today: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        })
    }

    async fn sign_in(&self, actor: Actor) {
        *self.caller.lock().await = actor;
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogApi for FakeBackend {
    async fn create(&self, draft: EntityDraft) -> Result<Entity> {
        let caller = *self.caller.lock().await;
        let status = match caller.role {
            Role::Admin => EntityStatus::Active,
            Role::Guide => EntityStatus::Pending,
            Role::Tourist => return Err(LifecycleError::PermissionDenied),
        };
        let owner = (caller.role == Role::Guide).then_some(caller.id);
        let entity = match draft {
            EntityDraft::Activity(d) => Entity::Activity(Activity {
                id: ActivityId::new(self.allocate_id()),
                title: d.title,
                description: d.description,
                price: d.price,
                duration: d.duration,
                place_id: d.place_id,
                image_url: d.image_url,
                status,
                owner,
            }),
            other => {
                return Err(LifecycleError::InvalidInput {
                    reason: format!("fake backend only stores activities, got {}", other.kind()),
                });
            },
        };
        self.entities.lock().await.insert(entity.key(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, key: EntityKey, draft: EntityDraft) -> Result<Entity> {
        let caller = *self.caller.lock().await;
        let mut entities = self.entities.lock().await;
        let entity = entities.get_mut(&key).ok_or(LifecycleError::NotFound)?;
        if caller.role != Role::Admin && entity.owner() != Some(caller.id) {
            return Err(LifecycleError::PermissionDenied);
        }
        if let (Entity::Activity(stored), EntityDraft::Activity(d)) = (&mut *entity, draft) {
            stored.title = d.title;
            stored.description = d.description;
            stored.price = d.price;
            stored.duration = d.duration;
        }
        Ok(entity.clone())
    }

    async fn delete(&self, key: EntityKey) -> Result<()> {
        let caller = *self.caller.lock().await;
        let mut entities = self.entities.lock().await;
        let entity = entities.get(&key).ok_or(LifecycleError::NotFound)?;
        if caller.role != Role::Admin && entity.owner() != Some(caller.id) {
            return Err(LifecycleError::PermissionDenied);
        }
        entities.remove(&key);
        Ok(())
    }

    async fn validate(&self, key: EntityKey) -> Result<Entity> {
        let caller = *self.caller.lock().await;
        if caller.role != Role::Admin {
            return Err(LifecycleError::PermissionDenied);
        }
        let mut entities = self.entities.lock().await;
        let entity = entities.get_mut(&key).ok_or(LifecycleError::NotFound)?;
        entity.set_status(EntityStatus::Active);
        Ok(entity.clone())
    }

    async fn fetch(&self, key: EntityKey) -> Result<Entity> {
        self.entities
            .lock()
            .await
            .get(&key)
            .cloned()
            .ok_or(LifecycleError::NotFound)
    }

    async fn list(&self, kind: EntityKind, scope: ListScope) -> Result<Vec<Entity>> {
        let caller = *self.caller.lock().await;
        if matches!(scope, ListScope::All | ListScope::Pending) && caller.role != Role::Admin {
            return Err(LifecycleError::PermissionDenied);
        }
        let entities = self.entities.lock().await;
        Ok(entities
            .values()
            .filter(|e| e.kind() == kind)
            .filter(|e| match scope {
                ListScope::Public => e.status() == EntityStatus::Active,
                ListScope::All => true,
                ListScope::Pending => e.status() == EntityStatus::Pending,
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReservationApi for FakeBackend {
    async fn book(&self, request: BookingRequest) -> Result<Reservation> {
        let caller = *self.caller.lock().await;
        if caller.role != Role::Tourist {
            return Err(LifecycleError::PermissionDenied);
        }
        if request.reservation_date < self.today {
            return Err(LifecycleError::InvalidInput {
                reason: "reservation date must not be in the past".to_owned(),
            });
        }
        let key = match request.target {
            BookingRef::Activity(id) => EntityKey::new(EntityKind::Activity, id.raw()),
            BookingRef::Circuit(id) => EntityKey::new(EntityKind::Circuit, id.raw()),
        };
        let entities = self.entities.lock().await;
        let target = entities.get(&key).ok_or(LifecycleError::NotFound)?;
        if target.status() != EntityStatus::Active {
            return Err(LifecycleError::TargetUnavailable);
        }
        let reservation = Reservation {
            id: ReservationId::new(self.allocate_id()),
            tourist: caller.id,
            target: request.target,
            reservation_date: request.reservation_date,
            status: ReservationStatus::Pending,
        };
        self.reservations
            .lock()
            .await
            .insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn set_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> Result<Reservation> {
        let caller = *self.caller.lock().await;
        let mut reservations = self.reservations.lock().await;
        let reservation = reservations.get_mut(&id).ok_or(LifecycleError::NotFound)?;
        rules::can_set_status(caller, reservation, status)?;
        reservation.status = status;
        Ok(reservation.clone())
    }

    async fn cancel_own(&self, id: ReservationId) -> Result<()> {
        let caller = *self.caller.lock().await;
        let mut reservations = self.reservations.lock().await;
        let reservation = reservations.get_mut(&id).ok_or(LifecycleError::NotFound)?;
        if reservation.tourist != caller.id {
            return Err(LifecycleError::PermissionDenied);
        }
        if reservation.status != ReservationStatus::Pending {
            return Err(LifecycleError::InvalidTransition);
        }
        reservation.status = ReservationStatus::Cancelled;
        Ok(())
    }

    async fn list_mine(&self) -> Result<Vec<Reservation>> {
        let caller = *self.caller.lock().await;
        let reservations = self.reservations.lock().await;
        Ok(reservations
            .values()
            .filter(|r| r.tourist == caller.id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Reservation>> {
        let caller = *self.caller.lock().await;
        if caller.role != Role::Admin {
            return Err(LifecycleError::PermissionDenied);
        }
        Ok(self.reservations.lock().await.values().cloned().collect())
    }
}

fn catalog_store(
    backend: &Arc<FakeBackend>,
) -> Store<CatalogState, CatalogAction, CatalogEnvironment, CatalogReducer> {
    let api: Arc<dyn CatalogApi> = backend.clone();
    Store::new(
        CatalogState::new(),
        CatalogReducer::new(),
        CatalogEnvironment::new(api),
    )
}

fn reservation_store(
    backend: &Arc<FakeBackend>,
) -> Store<ReservationState, ReservationAction, ReservationEnvironment, ReservationReducer> {
    let api: Arc<dyn ReservationApi> = backend.clone();
    Store::new(
        ReservationState::new(),
        ReservationReducer::new(),
        ReservationEnvironment::new(api, test_clock()),
    )
}

fn activity_draft(title: &str) -> EntityDraft {
    EntityDraft::Activity(ActivityDraft {
        title: title.to_owned(),
        description: "Pottery workshop in the medina".to_owned(),
        price: 150.0,
        duration: "2h".to_owned(),
        place_id: None,
        image_url: None,
    })
}

#[tokio::test]
async fn guide_submission_reaches_tourists_only_after_validation() {
    let backend = FakeBackend::new();
    let store = catalog_store(&backend);

    // Guide submits; the entity comes back PENDING
    backend.sign_in(GUIDE).await;
    store
        .send(CatalogAction::Submit {
            actor: GUIDE,
            draft: activity_draft("Atelier Poterie"),
        })
        .await;

    let state = store.snapshot().await;
    assert_eq!(state.count(), 1);
    let key = *state.entities.keys().next().unwrap();
    assert_eq!(state.get(&key).unwrap().status(), EntityStatus::Pending);
    assert_eq!(state.get(&key).unwrap().owner(), Some(GUIDE.id));

    // A tourist's public view is empty
    assert_eq!(
        queue::visible(&state, queue::Viewer::Tourist, EntityKind::Activity).count(),
        0
    );
    // The guide still sees their own submission
    assert_eq!(
        queue::visible(&state, queue::Viewer::Guide(GUIDE.id), EntityKind::Activity).count(),
        1
    );

    // Admin works the moderation queue
    backend.sign_in(ADMIN).await;
    store
        .send(CatalogAction::Approve { actor: ADMIN, key })
        .await;

    let state = store.snapshot().await;
    assert_eq!(state.get(&key).unwrap().status(), EntityStatus::Active);
    assert_eq!(
        queue::visible(&state, queue::Viewer::Tourist, EntityKind::Activity).count(),
        1
    );
    assert_eq!(queue::pending_queue(&state).count(), 0);
}

#[tokio::test]
async fn admin_created_content_skips_moderation() {
    let backend = FakeBackend::new();
    let store = catalog_store(&backend);

    backend.sign_in(ADMIN).await;
    store
        .send(CatalogAction::Submit {
            actor: ADMIN,
            draft: activity_draft("Visite guidée"),
        })
        .await;

    let state = store.snapshot().await;
    let entity = state.entities.values().next().unwrap();
    assert_eq!(entity.status(), EntityStatus::Active);
    assert_eq!(entity.owner(), None);
}

#[tokio::test]
async fn booking_runs_to_confirmation_and_admin_cancellation() {
    let backend = FakeBackend::new();
    let catalog = catalog_store(&backend);
    let reservations = reservation_store(&backend);

    // Seed an ACTIVE activity
    backend.sign_in(ADMIN).await;
    catalog
        .send(CatalogAction::Submit {
            actor: ADMIN,
            draft: activity_draft("Atelier Poterie"),
        })
        .await;
    let key = *catalog.snapshot().await.entities.keys().next().unwrap();
    let target = BookingRef::Activity(ActivityId::new(key.id));

    // Tourist books for a future date
    backend.sign_in(TOURIST).await;
    reservations
        .send(ReservationAction::Book {
            actor: TOURIST,
            target,
            target_status: EntityStatus::Active,
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        })
        .await;

    let state = reservations.snapshot().await;
    assert_eq!(state.count(), 1);
    let id = *state.reservations.keys().next().unwrap();
    assert_eq!(state.get(&id).unwrap().status, ReservationStatus::Pending);

    // Admin confirms
    backend.sign_in(ADMIN).await;
    reservations
        .send(ReservationAction::SetStatus {
            actor: ADMIN,
            id,
            status: ReservationStatus::Confirmed,
        })
        .await;
    assert_eq!(
        reservations.snapshot().await.get(&id).unwrap().status,
        ReservationStatus::Confirmed
    );

    // The owning tourist can no longer cancel a confirmed booking
    backend.sign_in(TOURIST).await;
    reservations
        .send(ReservationAction::CancelOwn { actor: TOURIST, id })
        .await;
    let state = reservations.snapshot().await;
    assert_eq!(state.last_error, Some(LifecycleError::PermissionDenied));
    assert_eq!(state.get(&id).unwrap().status, ReservationStatus::Confirmed);

    // But an admin can
    backend.sign_in(ADMIN).await;
    reservations
        .send(ReservationAction::SetStatus {
            actor: ADMIN,
            id,
            status: ReservationStatus::Cancelled,
        })
        .await;
    assert_eq!(
        reservations.snapshot().await.get(&id).unwrap().status,
        ReservationStatus::Cancelled
    );
}

#[tokio::test]
async fn tourist_cancels_a_pending_booking_exactly_once() {
    let backend = FakeBackend::new();
    let catalog = catalog_store(&backend);
    let reservations = reservation_store(&backend);

    backend.sign_in(ADMIN).await;
    catalog
        .send(CatalogAction::Submit {
            actor: ADMIN,
            draft: activity_draft("Atelier Poterie"),
        })
        .await;
    let key = *catalog.snapshot().await.entities.keys().next().unwrap();

    // Book and cancel on the same day
    backend.sign_in(TOURIST).await;
    reservations
        .send(ReservationAction::Book {
            actor: TOURIST,
            target: BookingRef::Activity(ActivityId::new(key.id)),
            target_status: EntityStatus::Active,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        })
        .await;
    let id = *reservations.snapshot().await.reservations.keys().next().unwrap();

    reservations
        .send(ReservationAction::CancelOwn { actor: TOURIST, id })
        .await;
    let state = reservations.snapshot().await;
    assert_eq!(state.get(&id).unwrap().status, ReservationStatus::Cancelled);
    assert_eq!(state.last_error, None);

    // A second cancel bounces off the terminal state
    reservations
        .send(ReservationAction::CancelOwn { actor: TOURIST, id })
        .await;
    let state = reservations.snapshot().await;
    assert_eq!(state.last_error, Some(LifecycleError::InvalidTransition));
    assert_eq!(state.get(&id).unwrap().status, ReservationStatus::Cancelled);
}

#[tokio::test]
async fn booking_a_pending_target_is_stopped_before_the_wire() {
    let backend = FakeBackend::new();
    let reservations = reservation_store(&backend);

    backend.sign_in(TOURIST).await;
    reservations
        .send(ReservationAction::Book {
            actor: TOURIST,
            target: BookingRef::Activity(ActivityId::new(99)),
            target_status: EntityStatus::Pending,
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        })
        .await;

    let state = reservations.snapshot().await;
    assert_eq!(state.last_error, Some(LifecycleError::TargetUnavailable));
    assert_eq!(state.count(), 0);
    // Nothing reached the backend
    assert!(backend.reservations.lock().await.is_empty());
}

#[tokio::test]
async fn stale_client_state_is_corrected_by_the_backend_verdict() {
    let backend = FakeBackend::new();
    let reservations = reservation_store(&backend);

    // The client believes the target is ACTIVE, but the backend has no
    // such activity: the request goes out and the refusal comes back
    backend.sign_in(TOURIST).await;
    reservations
        .send(ReservationAction::Book {
            actor: TOURIST,
            target: BookingRef::Activity(ActivityId::new(42)),
            target_status: EntityStatus::Active,
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        })
        .await;

    let state = reservations.snapshot().await;
    assert_eq!(state.last_error, Some(LifecycleError::NotFound));
    assert_eq!(state.count(), 0);
}

#[tokio::test]
async fn guide_cannot_touch_a_foreign_submission() {
    let backend = FakeBackend::new();
    let store = catalog_store(&backend);
    let other_guide = Actor::new(UserId::new(8), Role::Guide);

    backend.sign_in(GUIDE).await;
    store
        .send(CatalogAction::Submit {
            actor: GUIDE,
            draft: activity_draft("Atelier Poterie"),
        })
        .await;
    let key = *store.snapshot().await.entities.keys().next().unwrap();

    backend.sign_in(other_guide).await;
    store
        .send(CatalogAction::Remove {
            actor: other_guide,
            key,
        })
        .await;

    let state = store.snapshot().await;
    assert_eq!(state.last_error, Some(LifecycleError::PermissionDenied));
    assert!(state.get(&key).is_some());
}
