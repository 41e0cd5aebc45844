//! Core domain value types: identifiers, roles, statuses, reservations,
//! reviews and reports.
//!
//! Identifiers are `i64` newtypes (the backend issues numeric ids) and
//! every wire-facing struct serializes with the backend's camelCase field
//! names.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::{ActivityId, CircuitId};

macro_rules! numeric_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wrap a raw backend id.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Get the raw backend id.
            #[must_use]
            pub const fn raw(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub(crate) use numeric_id;

numeric_id!(
    /// Unique identifier for a user account
    UserId
);
numeric_id!(
    /// Unique identifier for a reservation
    ReservationId
);
numeric_id!(
    /// Unique identifier for a review
    ReviewId
);
numeric_id!(
    /// Unique identifier for a report
    ReportId
);

// ============================================================================
// Roles and account status
// ============================================================================

/// The three platform roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Browses and books; sees only ACTIVE content.
    Tourist,
    /// Proposes content; submissions start PENDING.
    Guide,
    /// Moderates content and confirms bookings.
    Admin,
}

impl Role {
    /// The role name as the backend spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tourist => "TOURIST",
            Self::Guide => "GUIDE",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account status of an identity.
///
/// A PENDING guide is issued no credential at login until an admin
/// activates the account; a SUSPENDED account keeps its record but is
/// rejected at authentication.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    /// Account may authenticate and act.
    Active,
    /// Account blocked by an admin.
    Suspended,
    /// Guide registration awaiting admin approval.
    Pending,
}

impl AccountStatus {
    /// The status name as the backend spells it in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::Pending => "PENDING",
        }
    }
}

/// A full identity record as the backend returns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Backend-issued id.
    pub id: UserId,
    /// Display name.
    pub full_name: String,
    /// Login email.
    pub email: String,
    /// Contact phone, if provided at registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Platform role.
    pub role: Role,
    /// Account status.
    #[serde(rename = "status")]
    pub account_status: AccountStatus,
    /// When the account was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Guide-specific profile fields, present for guide accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide: Option<GuideProfile>,
}

/// Guide profile extension carried on guide identities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideProfile {
    /// Short biography shown on guide pages.
    #[serde(default)]
    pub bio: Option<String>,
    /// Spoken languages, comma separated as the backend stores them.
    #[serde(default)]
    pub languages: Option<String>,
}

/// Aggregate account counts for the admin dashboard.
///
/// The backend builds this map on the fly; missing keys read as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserStats {
    /// Every account on the platform.
    pub total_users: u64,
    /// Guide accounts, all statuses.
    pub total_guides: u64,
    /// Guide accounts currently ACTIVE.
    pub total_active_guides: u64,
    /// Guide accounts currently SUSPENDED.
    pub total_suspended_guides: u64,
    /// Tourist accounts.
    pub total_tourists: u64,
}

/// The minimal identity summary stamped on every command.
///
/// This is what the session layer holds locally: enough to authorize
/// synchronously without a network round trip. The backend re-checks
/// everything server-side; the actor exists so rejections happen before
/// any request is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Acting user's id.
    pub id: UserId,
    /// Acting user's role.
    pub role: Role,
}

impl Actor {
    /// Build an actor summary.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }
}

// ============================================================================
// Moderation and booking statuses
// ============================================================================

/// Moderation status of a content entity.
///
/// Deletion is an action, not a status; there is no tombstone state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityStatus {
    /// Awaiting admin validation; visible to the owner and admins only.
    Pending,
    /// Publicly visible.
    Active,
}

/// Status of a reservation.
///
/// `Cancelled` is terminal. `Confirmed` is terminal only from the
/// tourist's side: an admin may still cancel a confirmed booking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Booked by a tourist, awaiting admin confirmation.
    Pending,
    /// Confirmed by an admin. Admin cancellation is still possible.
    Confirmed,
    /// Cancelled by an admin, or by the owning tourist while pending. Terminal.
    Cancelled,
}

impl ReservationStatus {
    /// Whether no further transition is defined from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The status name as the backend spells it in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// What a reservation points at. Immutable after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BookingRef {
    /// A bookable activity.
    Activity(ActivityId),
    /// A bookable circuit.
    Circuit(CircuitId),
}

/// A booking held by a tourist against an activity or circuit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Backend-issued id.
    pub id: ReservationId,
    /// The tourist who created the booking. Owner for read purposes.
    pub tourist: UserId,
    /// The booked target. Immutable.
    pub target: BookingRef,
    /// Requested date of the activity or circuit.
    pub reservation_date: NaiveDate,
    /// Current lifecycle status.
    pub status: ReservationStatus,
}

// ============================================================================
// Reviews
// ============================================================================

/// A star rating, always within 1..=5.
///
/// The range check runs on deserialization too, so a malformed backend
/// payload cannot smuggle in an out-of-range value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Build a rating, rejecting values outside 1..=5.
    pub fn new(stars: u8) -> crate::error::Result<Self> {
        if (1..=5).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(crate::error::LifecycleError::InvalidInput {
                reason: format!("rating must be between 1 and 5, got {stars}"),
            })
        }
    }

    /// The number of stars.
    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = crate::error::LifecycleError;

    fn try_from(stars: u8) -> crate::error::Result<Self> {
        Self::new(stars)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A tourist review attached to a place.
///
/// Reviews are append/delete only, no state machine. Deletion is an
/// admin moderation privilege.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Backend-issued id.
    pub id: ReviewId,
    /// Authoring user.
    pub author: UserId,
    /// Reviewed place.
    pub place: crate::entity::PlaceId,
    /// Star rating, 1..=5.
    pub rating: Rating,
    /// Free-text comment.
    pub comment: String,
    /// When the review was written.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Reports
// ============================================================================

/// Triage status of a report. Transitions are forward-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    /// Newly submitted.
    Open,
    /// Picked up by an admin.
    InProgress,
    /// Handled. Terminal.
    Resolved,
}

impl ReportStatus {
    /// Position in the triage pipeline, used to reject backwards moves.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::InProgress => 1,
            Self::Resolved => 2,
        }
    }

    /// The status name as the backend spells it in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
        }
    }
}

/// A user-submitted problem report, triaged by admins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Backend-issued id.
    pub id: ReportId,
    /// Free-form category chosen by the reporter.
    pub report_type: String,
    /// What happened.
    pub description: String,
    /// Triage status.
    pub status: ReportStatus,
    /// When the report was submitted.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Fields a user supplies when submitting a report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    /// Free-form category.
    pub report_type: String,
    /// What happened.
    pub description: String,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_wire_spelling() {
        let json = serde_json::to_string(&Role::Guide).expect("serialize");
        assert_eq!(json, "\"GUIDE\"");
        let back: Role = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Role::Guide);
    }

    #[test]
    fn rating_rejects_out_of_range() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert_eq!(Rating::new(3).map(Rating::stars), Ok(3));
    }

    #[test]
    fn rating_range_is_checked_on_the_wire_too() {
        assert!(serde_json::from_str::<Rating>("0").is_err());
        assert!(serde_json::from_str::<Rating>("17").is_err());
        let three: Rating = serde_json::from_str("3").expect("in range");
        assert_eq!(three.stars(), 3);
        assert_eq!(serde_json::to_string(&three).expect("serialize"), "3");
    }

    #[test]
    fn user_stats_default_missing_counts_to_zero() {
        let stats: UserStats =
            serde_json::from_str(r#"{"totalUsers": 12, "totalGuides": 4}"#).expect("deserialize");
        assert_eq!(stats.total_users, 12);
        assert_eq!(stats.total_guides, 4);
        assert_eq!(stats.total_tourists, 0);
    }

    #[test]
    fn only_cancelled_reservations_are_terminal() {
        assert!(!ReservationStatus::Pending.is_terminal());
        // An admin may still cancel a confirmed booking
        assert!(!ReservationStatus::Confirmed.is_terminal());
        assert!(ReservationStatus::Cancelled.is_terminal());
    }

    #[test]
    fn report_ranks_are_ordered() {
        assert!(ReportStatus::Open.rank() < ReportStatus::InProgress.rank());
        assert!(ReportStatus::InProgress.rank() < ReportStatus::Resolved.rank());
    }
}
