//! Read-side projections over the catalog: who sees what.
//!
//! The write side never filters; these projections derive role-scoped
//! views lazily from [`CatalogState`]. Tourists and anonymous visitors
//! see ACTIVE content only, a guide additionally sees their own pending
//! submissions, and admins see everything including the moderation queue.

use crate::catalog::CatalogState;
use crate::entity::{Entity, EntityKind};
use crate::reservation::ReservationState;
use crate::types::{Actor, EntityStatus, Reservation, Role, UserId};

/// Who is looking at the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Viewer {
    /// Not logged in. Public content only.
    Visitor,
    /// A tourist session. Public content only.
    Tourist,
    /// A guide session. Public content plus their own submissions.
    Guide(UserId),
    /// An admin session. Everything.
    Admin,
}

impl Viewer {
    /// Derive the viewer from an optional session actor.
    #[must_use]
    pub fn from_actor(actor: Option<Actor>) -> Self {
        match actor {
            None => Self::Visitor,
            Some(actor) => match actor.role {
                Role::Tourist => Self::Tourist,
                Role::Guide => Self::Guide(actor.id),
                Role::Admin => Self::Admin,
            },
        }
    }

    /// Whether this viewer may see the given entity.
    #[must_use]
    pub fn can_see(self, entity: &Entity) -> bool {
        match self {
            Self::Admin => true,
            Self::Guide(id) => {
                entity.status() == EntityStatus::Active || entity.owner() == Some(id)
            },
            Self::Visitor | Self::Tourist => entity.status() == EntityStatus::Active,
        }
    }
}

/// Entities of one kind the viewer is allowed to see, in key order.
pub fn visible<'a>(
    catalog: &'a CatalogState,
    viewer: Viewer,
    kind: EntityKind,
) -> impl Iterator<Item = &'a Entity> {
    catalog
        .entities
        .iter()
        .filter(move |(key, _)| key.kind == kind)
        .map(|(_, entity)| entity)
        .filter(move |entity| viewer.can_see(entity))
}

/// Entities of one kind, scoped to the viewer with an optional status
/// request. Tourists and visitors are clamped to ACTIVE whatever they
/// ask for; a guide with no filter gets their own submissions only,
/// whatever the status; an admin with no filter gets everything.
pub fn list_for<'a>(
    catalog: &'a CatalogState,
    viewer: Viewer,
    kind: EntityKind,
    filter: Option<EntityStatus>,
) -> impl Iterator<Item = &'a Entity> {
    catalog
        .entities
        .iter()
        .filter(move |(key, _)| key.kind == kind)
        .map(|(_, entity)| entity)
        .filter(move |entity| match (viewer, filter) {
            (Viewer::Visitor | Viewer::Tourist, _) => {
                entity.status() == EntityStatus::Active
            },
            (Viewer::Guide(id), None) => entity.owner() == Some(id),
            (Viewer::Guide(_), Some(status)) => {
                viewer.can_see(entity) && entity.status() == status
            },
            (Viewer::Admin, None) => true,
            (Viewer::Admin, Some(status)) => entity.status() == status,
        })
}

/// Reservations the actor may read: a tourist sees their own, an admin
/// sees all of them, a guide sees none.
pub fn reservations_visible<'a>(
    state: &'a ReservationState,
    actor: Actor,
) -> impl Iterator<Item = &'a Reservation> {
    state
        .reservations
        .values()
        .filter(move |reservation| match actor.role {
            Role::Admin => true,
            Role::Tourist => reservation.tourist == actor.id,
            Role::Guide => false,
        })
}

/// The admin moderation queue: every PENDING entity across all kinds,
/// in key order.
pub fn pending_queue(catalog: &CatalogState) -> impl Iterator<Item = &Entity> {
    catalog
        .entities
        .values()
        .filter(|entity| entity.status() == EntityStatus::Pending)
}

/// A guide's own submissions across all kinds, whatever their status.
pub fn owned_by(catalog: &CatalogState, owner: UserId) -> impl Iterator<Item = &Entity> {
    catalog
        .entities
        .values()
        .filter(move |entity| entity.owner() == Some(owner))
}

/// Count of pending entities per kind, for the admin dashboard badges.
#[must_use]
pub fn pending_counts(catalog: &CatalogState) -> [(EntityKind, usize); 5] {
    EntityKind::ALL.map(|kind| {
        let count = catalog
            .entities
            .iter()
            .filter(|(key, entity)| key.kind == kind && entity.status() == EntityStatus::Pending)
            .count();
        (kind, count)
    })
}
