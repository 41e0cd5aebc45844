//! Booking lifecycle reducer.
//!
//! Tourists book ACTIVE activities or circuits for a future date; the
//! booking enters PENDING. Admins confirm or cancel; the owning tourist
//! may cancel only while the booking is still pending. Confirmed and
//! cancelled are terminal.
//!
//! The booking command carries the target's moderation status as the
//! caller currently knows it from the catalog, so the availability check
//! stays a pure rule with no cross-reducer lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use taroudant_core::{
    effect::{Effect, Effects},
    environment::Clock,
    reducer::Reducer,
    smallvec,
};

use crate::api::{BookingRequest, SharedReservationApi};
use crate::error::LifecycleError;
use crate::rules;
use crate::types::{
    Actor, BookingRef, EntityStatus, Reservation, ReservationId, ReservationStatus, Role,
};

// ============================================================================
// State
// ============================================================================

/// Locally known reservations: the tourist's own, or all of them for an
/// admin session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReservationState {
    /// Reservations by id.
    pub reservations: BTreeMap<ReservationId, Reservation>,
    /// Why the most recent command was refused, if it was.
    pub last_error: Option<LifecycleError>,
}

impl ReservationState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up one reservation.
    #[must_use]
    pub fn get(&self, id: &ReservationId) -> Option<&Reservation> {
        self.reservations.get(id)
    }

    /// Number of known reservations.
    #[must_use]
    pub fn count(&self) -> usize {
        self.reservations.len()
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Actions for the booking lifecycle.
#[derive(Clone, Debug, PartialEq)]
pub enum ReservationAction {
    // Commands
    /// Book an activity or circuit.
    Book {
        /// Acting user.
        actor: Actor,
        /// What is being booked.
        target: BookingRef,
        /// Moderation status of the target, as known from the catalog.
        target_status: EntityStatus,
        /// Requested date.
        date: NaiveDate,
    },

    /// Admin move of a reservation to a new status.
    SetStatus {
        /// Acting user.
        actor: Actor,
        /// Which reservation.
        id: ReservationId,
        /// The requested status.
        status: ReservationStatus,
    },

    /// Tourist cancellation of their own pending reservation.
    CancelOwn {
        /// Acting user.
        actor: Actor,
        /// Which reservation.
        id: ReservationId,
    },

    /// Load the acting tourist's reservations.
    LoadMine {
        /// Acting user.
        actor: Actor,
    },

    /// Load every reservation on the platform. Admin only.
    LoadAll {
        /// Acting user.
        actor: Actor,
    },

    // Events
    /// The backend stored the booking.
    Booked {
        /// The new reservation, PENDING.
        reservation: Reservation,
    },

    /// The backend applied a status move.
    StatusChanged {
        /// The reservation in its new status.
        reservation: Reservation,
    },

    /// The backend accepted the tourist's cancellation.
    Cancelled {
        /// Which reservation was cancelled.
        id: ReservationId,
    },

    /// The backend answered a list call.
    Loaded {
        /// The reservations visible to the caller.
        reservations: Vec<Reservation>,
    },

    /// A command was refused, locally or by the backend.
    OperationFailed {
        /// Why.
        error: LifecycleError,
    },
}

// ============================================================================
// Environment
// ============================================================================

/// Environment dependencies for the booking reducer.
#[derive(Clone)]
pub struct ReservationEnvironment {
    /// The backend the lifecycle talks to.
    pub api: SharedReservationApi,
    /// Clock for the no-past-date rule.
    pub clock: Arc<dyn Clock>,
}

impl ReservationEnvironment {
    /// Creates a new `ReservationEnvironment`.
    #[must_use]
    pub fn new(api: SharedReservationApi, clock: Arc<dyn Clock>) -> Self {
        Self { api, clock }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer driving the PENDING → CONFIRMED/CANCELLED booking machine.
#[derive(Clone, Debug, Default)]
pub struct ReservationReducer;

impl ReservationReducer {
    /// Creates a new `ReservationReducer`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn apply_event(state: &mut ReservationState, action: &ReservationAction) {
        match action {
            ReservationAction::Booked { reservation }
            | ReservationAction::StatusChanged { reservation } => {
                state
                    .reservations
                    .insert(reservation.id, reservation.clone());
                state.last_error = None;
            },

            ReservationAction::Cancelled { id } => {
                if let Some(reservation) = state.reservations.get_mut(id) {
                    reservation.status = ReservationStatus::Cancelled;
                }
                state.last_error = None;
            },

            ReservationAction::Loaded { reservations } => {
                state.reservations =
                    reservations.iter().map(|r| (r.id, r.clone())).collect();
                state.last_error = None;
            },

            ReservationAction::OperationFailed { error } => {
                state.last_error = Some(error.clone());
            },

            // Commands don't modify state
            ReservationAction::Book { .. }
            | ReservationAction::SetStatus { .. }
            | ReservationAction::CancelOwn { .. }
            | ReservationAction::LoadMine { .. }
            | ReservationAction::LoadAll { .. } => {},
        }
    }

    fn reject(state: &mut ReservationState, error: LifecycleError) -> Effects<ReservationAction> {
        tracing::warn!(%error, "reservation command refused");
        Self::apply_event(state, &ReservationAction::OperationFailed { error });
        Effects::new()
    }
}

impl Reducer for ReservationReducer {
    type State = ReservationState;
    type Action = ReservationAction;
    type Environment = ReservationEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            // ========== Book ==========
            ReservationAction::Book {
                actor,
                target,
                target_status,
                date,
            } => {
                let today = env.clock.now().date_naive();
                if let Err(error) = rules::can_book(actor, target_status, date, today) {
                    return Self::reject(state, error);
                }

                let api = Arc::clone(&env.api);
                let request = BookingRequest {
                    target,
                    reservation_date: date,
                };
                smallvec![Effect::future(async move {
                    Some(match api.book(request).await {
                        Ok(reservation) => ReservationAction::Booked { reservation },
                        Err(error) => ReservationAction::OperationFailed { error },
                    })
                })]
            },

            // ========== Admin status move ==========
            ReservationAction::SetStatus { actor, id, status } => {
                let Some(reservation) = state.reservations.get(&id) else {
                    return Self::reject(state, LifecycleError::NotFound);
                };
                if let Err(error) = rules::can_set_status(actor, reservation, status) {
                    return Self::reject(state, error);
                }

                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.set_status(id, status).await {
                        Ok(reservation) => ReservationAction::StatusChanged { reservation },
                        Err(error) => ReservationAction::OperationFailed { error },
                    })
                })]
            },

            // ========== Tourist cancellation ==========
            ReservationAction::CancelOwn { actor, id } => {
                let Some(reservation) = state.reservations.get(&id) else {
                    return Self::reject(state, LifecycleError::NotFound);
                };
                if let Err(error) = rules::can_cancel_own(actor, reservation) {
                    return Self::reject(state, error);
                }

                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.cancel_own(id).await {
                        Ok(()) => ReservationAction::Cancelled { id },
                        Err(error) => ReservationAction::OperationFailed { error },
                    })
                })]
            },

            // ========== Loads ==========
            ReservationAction::LoadMine { actor } => {
                if actor.role != Role::Tourist {
                    return Self::reject(state, LifecycleError::PermissionDenied);
                }
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.list_mine().await {
                        Ok(reservations) => ReservationAction::Loaded { reservations },
                        Err(error) => ReservationAction::OperationFailed { error },
                    })
                })]
            },

            ReservationAction::LoadAll { actor } => {
                if actor.role != Role::Admin {
                    return Self::reject(state, LifecycleError::PermissionDenied);
                }
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(match api.list_all().await {
                        Ok(reservations) => ReservationAction::Loaded { reservations },
                        Err(error) => ReservationAction::OperationFailed { error },
                    })
                })]
            },

            // ========== Events ==========
            event => {
                Self::apply_event(state, &event);
                Effects::new()
            },
        }
    }
}
