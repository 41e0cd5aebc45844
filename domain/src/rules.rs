//! Authorization and transition rules, as pure functions.
//!
//! Every lifecycle reducer calls into this module before emitting a
//! network effect, so a forbidden command is rejected synchronously and
//! deterministically. The backend enforces the same contract server-side;
//! these functions exist so the client never issues a request it already
//! knows will be refused.
//!
//! All functions take the acting [`Actor`] explicitly. None of them touch
//! state or the clock; callers pass "today" in where a date check is
//! needed, which keeps every rule trivially testable.

use chrono::NaiveDate;

use crate::entity::Entity;
use crate::error::{LifecycleError, Result};
use crate::types::{
    Actor, EntityStatus, Identity, Report, ReportStatus, Reservation, ReservationStatus, Role,
};

/// Outcome of a validate command, distinguishing a real activation from
/// an idempotent no-op on already-active content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidateOutcome {
    /// The entity was PENDING and should move to ACTIVE.
    Activate,
    /// The entity is already ACTIVE; nothing to do, not an error.
    NoOp,
}

// ============================================================================
// Entity lifecycle
// ============================================================================

/// Status a freshly created entity starts in, by creator role.
///
/// Admin-created content is born ACTIVE and never enters moderation;
/// guide submissions start PENDING. Tourists cannot create content at all.
pub fn initial_status(role: Role) -> Result<EntityStatus> {
    match role {
        Role::Admin => Ok(EntityStatus::Active),
        Role::Guide => Ok(EntityStatus::Pending),
        Role::Tourist => Err(LifecycleError::PermissionDenied),
    }
}

/// Whether the actor may edit this entity.
///
/// Admins edit anything; a guide edits only content they own. Editing
/// never changes the moderation status.
pub fn can_edit(actor: Actor, entity: &Entity) -> Result<()> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Guide if entity.owner() == Some(actor.id) => Ok(()),
        Role::Guide | Role::Tourist => Err(LifecycleError::PermissionDenied),
    }
}

/// Whether the actor may delete this entity. Same ownership rule as
/// editing; deletion is allowed from either status.
pub fn can_delete(actor: Actor, entity: &Entity) -> Result<()> {
    can_edit(actor, entity)
}

/// Whether the actor may validate (approve) this entity, and what the
/// validation amounts to.
///
/// Validation is admin-only. Validating already-active content is an
/// idempotent no-op rather than an error.
pub fn validate(actor: Actor, entity: &Entity) -> Result<ValidateOutcome> {
    if actor.role != Role::Admin {
        return Err(LifecycleError::PermissionDenied);
    }
    match entity.status() {
        EntityStatus::Pending => Ok(ValidateOutcome::Activate),
        EntityStatus::Active => Ok(ValidateOutcome::NoOp),
    }
}

// ============================================================================
// Reservations
// ============================================================================

/// Whether the actor may book a target in the given status on the given
/// date.
///
/// Only tourists book. The target must be ACTIVE (pending content is not
/// bookable even by its owner) and the requested date must not be in
/// the past. `today` comes from the caller's clock.
pub fn can_book(
    actor: Actor,
    target_status: EntityStatus,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<()> {
    if actor.role != Role::Tourist {
        return Err(LifecycleError::PermissionDenied);
    }
    if target_status != EntityStatus::Active {
        return Err(LifecycleError::TargetUnavailable);
    }
    if date < today {
        return Err(LifecycleError::InvalidInput {
            reason: "reservation date must not be in the past".to_owned(),
        });
    }
    Ok(())
}

/// Whether an admin may move a reservation to the requested status.
///
/// This backs the admin status endpoint: CONFIRMED is reachable only
/// from PENDING, CANCELLED from PENDING or CONFIRMED. Nothing ever
/// returns to PENDING, and terminal states accept no further moves.
pub fn can_set_status(
    actor: Actor,
    reservation: &Reservation,
    requested: ReservationStatus,
) -> Result<()> {
    if actor.role != Role::Admin {
        return Err(LifecycleError::PermissionDenied);
    }
    match (reservation.status, requested) {
        (ReservationStatus::Pending, ReservationStatus::Confirmed)
        | (
            ReservationStatus::Pending | ReservationStatus::Confirmed,
            ReservationStatus::Cancelled,
        ) => Ok(()),
        _ => Err(LifecycleError::InvalidTransition),
    }
}

/// Whether a tourist may cancel their own reservation.
///
/// Cancellation is limited to the owning tourist and only while the
/// booking is still PENDING. A confirmed booking can only be cancelled
/// by an admin.
pub fn can_cancel_own(actor: Actor, reservation: &Reservation) -> Result<()> {
    if actor.role != Role::Tourist || reservation.tourist != actor.id {
        return Err(LifecycleError::PermissionDenied);
    }
    match reservation.status {
        ReservationStatus::Pending => Ok(()),
        ReservationStatus::Confirmed => Err(LifecycleError::PermissionDenied),
        ReservationStatus::Cancelled => Err(LifecycleError::InvalidTransition),
    }
}

// ============================================================================
// Reports and reviews
// ============================================================================

/// Whether the actor may move a report to the requested triage status.
///
/// Triage is admin-only and forward-only: OPEN → IN_PROGRESS → RESOLVED,
/// with skipping ahead allowed but no backwards move and no self-move.
pub fn can_advance_report(actor: Actor, report: &Report, requested: ReportStatus) -> Result<()> {
    if actor.role != Role::Admin {
        return Err(LifecycleError::PermissionDenied);
    }
    if requested.rank() <= report.status.rank() {
        return Err(LifecycleError::InvalidTransition);
    }
    Ok(())
}

/// Whether the actor may delete a review. Admin-only moderation privilege;
/// authors cannot retract their own reviews.
pub fn can_delete_review(actor: Actor) -> Result<()> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(LifecycleError::PermissionDenied)
    }
}

// ============================================================================
// User directory
// ============================================================================

/// Whether the actor may read or change the user directory. The whole
/// admin surface is admin-only.
pub fn can_manage_users(actor: Actor) -> Result<()> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(LifecycleError::PermissionDenied)
    }
}

/// Whether the actor may act on this account through a role-specific
/// admin route.
///
/// Status moves and guide deletion go through guide routes, tourist
/// deletion through its own; a target of the wrong role means the wrong
/// endpoint was picked, not a forbidden caller.
pub fn can_moderate_account(actor: Actor, target: &Identity, expected: Role) -> Result<()> {
    can_manage_users(actor)?;
    if target.role == expected {
        Ok(())
    } else {
        Err(LifecycleError::InvalidInput {
            reason: format!("user {} is not a {expected}", target.id),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entity::{ActivityId, Entity, Place, PlaceId};
    use crate::types::{AccountStatus, BookingRef, ReportId, ReservationId, UserId};

    fn admin() -> Actor {
        Actor::new(UserId::new(1), Role::Admin)
    }

    fn guide(id: i64) -> Actor {
        Actor::new(UserId::new(id), Role::Guide)
    }

    fn tourist(id: i64) -> Actor {
        Actor::new(UserId::new(id), Role::Tourist)
    }

    fn place(status: EntityStatus, owner: Option<i64>) -> Entity {
        Entity::Place(Place {
            id: PlaceId::new(10),
            name: "Palais Salam".to_owned(),
            description: String::new(),
            city: "Taroudant".to_owned(),
            latitude: 30.47,
            longitude: -8.87,
            image_url: None,
            status,
            owner: owner.map(UserId::new),
        })
    }

    fn reservation(tourist_id: i64, status: ReservationStatus) -> Reservation {
        Reservation {
            id: ReservationId::new(1),
            tourist: UserId::new(tourist_id),
            target: BookingRef::Activity(ActivityId::new(3)),
            reservation_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            status,
        }
    }

    fn identity(id: i64, role: Role) -> Identity {
        Identity {
            id: UserId::new(id),
            full_name: "Sam".to_owned(),
            email: "sam@example.com".to_owned(),
            phone: None,
            role,
            account_status: AccountStatus::Active,
            created_at: None,
            guide: None,
        }
    }

    fn report(status: ReportStatus) -> Report {
        Report {
            id: ReportId::new(1),
            report_type: "CONTENU".to_owned(),
            description: "broken listing".to_owned(),
            status,
            created_at: None,
        }
    }

    #[test]
    fn admin_content_is_born_active_guide_content_pending() {
        assert_eq!(initial_status(Role::Admin), Ok(EntityStatus::Active));
        assert_eq!(initial_status(Role::Guide), Ok(EntityStatus::Pending));
        assert_eq!(
            initial_status(Role::Tourist),
            Err(LifecycleError::PermissionDenied)
        );
    }

    #[test]
    fn guide_edits_only_own_content() {
        let mine = place(EntityStatus::Pending, Some(7));
        let theirs = place(EntityStatus::Pending, Some(8));
        assert!(can_edit(guide(7), &mine).is_ok());
        assert_eq!(
            can_edit(guide(7), &theirs),
            Err(LifecycleError::PermissionDenied)
        );
        assert!(can_edit(admin(), &theirs).is_ok());
    }

    #[test]
    fn tourists_never_edit() {
        let entity = place(EntityStatus::Active, None);
        assert_eq!(
            can_edit(tourist(5), &entity),
            Err(LifecycleError::PermissionDenied)
        );
    }

    #[test]
    fn validate_is_admin_only_and_idempotent() {
        let pending = place(EntityStatus::Pending, Some(7));
        let active = place(EntityStatus::Active, Some(7));
        assert_eq!(validate(admin(), &pending), Ok(ValidateOutcome::Activate));
        assert_eq!(validate(admin(), &active), Ok(ValidateOutcome::NoOp));
        assert_eq!(
            validate(guide(7), &pending),
            Err(LifecycleError::PermissionDenied)
        );
    }

    #[test]
    fn booking_requires_tourist_active_target_and_future_date() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let future = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let past = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();

        assert!(can_book(tourist(5), EntityStatus::Active, future, today).is_ok());
        assert!(can_book(tourist(5), EntityStatus::Active, today, today).is_ok());
        assert_eq!(
            can_book(guide(7), EntityStatus::Active, future, today),
            Err(LifecycleError::PermissionDenied)
        );
        assert_eq!(
            can_book(tourist(5), EntityStatus::Pending, future, today),
            Err(LifecycleError::TargetUnavailable)
        );
        assert!(matches!(
            can_book(tourist(5), EntityStatus::Active, past, today),
            Err(LifecycleError::InvalidInput { .. })
        ));
    }

    #[test]
    fn admin_status_moves_follow_the_machine() {
        let pending = reservation(5, ReservationStatus::Pending);
        let confirmed = reservation(5, ReservationStatus::Confirmed);
        let cancelled = reservation(5, ReservationStatus::Cancelled);

        assert!(can_set_status(admin(), &pending, ReservationStatus::Confirmed).is_ok());
        assert!(can_set_status(admin(), &pending, ReservationStatus::Cancelled).is_ok());
        assert!(can_set_status(admin(), &confirmed, ReservationStatus::Cancelled).is_ok());
        assert_eq!(
            can_set_status(admin(), &confirmed, ReservationStatus::Confirmed),
            Err(LifecycleError::InvalidTransition)
        );
        assert_eq!(
            can_set_status(admin(), &cancelled, ReservationStatus::Confirmed),
            Err(LifecycleError::InvalidTransition)
        );
        assert_eq!(
            can_set_status(admin(), &confirmed, ReservationStatus::Pending),
            Err(LifecycleError::InvalidTransition)
        );
        assert_eq!(
            can_set_status(tourist(5), &pending, ReservationStatus::Confirmed),
            Err(LifecycleError::PermissionDenied)
        );
    }

    #[test]
    fn tourist_cancels_own_pending_booking_only() {
        let pending = reservation(5, ReservationStatus::Pending);
        let confirmed = reservation(5, ReservationStatus::Confirmed);
        let cancelled = reservation(5, ReservationStatus::Cancelled);

        assert!(can_cancel_own(tourist(5), &pending).is_ok());
        assert_eq!(
            can_cancel_own(tourist(6), &pending),
            Err(LifecycleError::PermissionDenied)
        );
        assert_eq!(
            can_cancel_own(tourist(5), &confirmed),
            Err(LifecycleError::PermissionDenied)
        );
        assert_eq!(
            can_cancel_own(tourist(5), &cancelled),
            Err(LifecycleError::InvalidTransition)
        );
    }

    #[test]
    fn report_triage_is_forward_only() {
        let open = report(ReportStatus::Open);
        let in_progress = report(ReportStatus::InProgress);

        assert!(can_advance_report(admin(), &open, ReportStatus::InProgress).is_ok());
        assert!(can_advance_report(admin(), &open, ReportStatus::Resolved).is_ok());
        assert!(can_advance_report(admin(), &in_progress, ReportStatus::Resolved).is_ok());
        assert_eq!(
            can_advance_report(admin(), &in_progress, ReportStatus::Open),
            Err(LifecycleError::InvalidTransition)
        );
        assert_eq!(
            can_advance_report(admin(), &open, ReportStatus::Open),
            Err(LifecycleError::InvalidTransition)
        );
        assert_eq!(
            can_advance_report(guide(7), &open, ReportStatus::Resolved),
            Err(LifecycleError::PermissionDenied)
        );
    }

    #[test]
    fn user_directory_is_admin_only() {
        assert!(can_manage_users(admin()).is_ok());
        assert_eq!(
            can_manage_users(guide(7)),
            Err(LifecycleError::PermissionDenied)
        );
        assert_eq!(
            can_manage_users(tourist(5)),
            Err(LifecycleError::PermissionDenied)
        );
    }

    #[test]
    fn account_moderation_checks_the_target_role() {
        let a_guide = identity(7, Role::Guide);
        let a_tourist = identity(5, Role::Tourist);

        assert!(can_moderate_account(admin(), &a_guide, Role::Guide).is_ok());
        assert!(can_moderate_account(admin(), &a_tourist, Role::Tourist).is_ok());
        assert!(matches!(
            can_moderate_account(admin(), &a_tourist, Role::Guide),
            Err(LifecycleError::InvalidInput { .. })
        ));
        assert_eq!(
            can_moderate_account(guide(7), &a_guide, Role::Guide),
            Err(LifecycleError::PermissionDenied)
        );
    }

    #[test]
    fn review_deletion_is_admin_only() {
        assert!(can_delete_review(admin()).is_ok());
        assert_eq!(
            can_delete_review(tourist(5)),
            Err(LifecycleError::PermissionDenied)
        );
    }
}
