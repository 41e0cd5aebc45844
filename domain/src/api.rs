//! Traits the remote backend is reached through.
//!
//! Reducers hold these as trait objects in their environment, so the same
//! lifecycle logic runs against the real HTTP client or an in-memory fake
//! in tests. Every method resolves to a [`Result`] carrying the lifecycle
//! error taxonomy; transport failures arrive as [`LifecycleError::Network`].
//!
//! [`LifecycleError::Network`]: crate::error::LifecycleError::Network

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entity::{Entity, EntityDraft, EntityKey, EntityKind, PlaceId};
use crate::error::Result;
use crate::types::{
    AccountStatus, BookingRef, Identity, Rating, Report, ReportDraft, ReportId, ReportStatus,
    Reservation, ReservationId, ReservationStatus, Review, ReviewId, UserId, UserStats,
};

/// Which slice of a kind's catalog a list call asks for.
///
/// The backend exposes these as separate routes with separate
/// authorization; the client picks the scope its viewer is entitled to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListScope {
    /// ACTIVE content only. What tourists and anonymous visitors see.
    Public,
    /// Every entity regardless of status. Admin dashboards.
    All,
    /// PENDING entities awaiting validation. The admin moderation queue.
    Pending,
}

/// Fields sent when a tourist books an activity or circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// What is being booked.
    pub target: BookingRef,
    /// Requested date.
    pub reservation_date: NaiveDate,
}

/// Fields sent when a tourist reviews a place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    /// Reviewed place.
    pub place: PlaceId,
    /// Star rating.
    pub rating: Rating,
    /// Free-text comment.
    pub comment: String,
}

/// Remote operations on the moderatable content catalog.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Create an entity. The backend stamps status and ownership from the
    /// authenticated caller.
    async fn create(&self, draft: EntityDraft) -> Result<Entity>;

    /// Replace the payload fields of an existing entity.
    async fn update(&self, key: EntityKey, draft: EntityDraft) -> Result<Entity>;

    /// Delete an entity.
    async fn delete(&self, key: EntityKey) -> Result<()>;

    /// Approve a pending entity, returning it in its new status.
    async fn validate(&self, key: EntityKey) -> Result<Entity>;

    /// Fetch one entity by key.
    async fn fetch(&self, key: EntityKey) -> Result<Entity>;

    /// List one kind at the given scope.
    async fn list(&self, kind: EntityKind, scope: ListScope) -> Result<Vec<Entity>>;
}

/// Remote operations on reservations.
#[async_trait]
pub trait ReservationApi: Send + Sync {
    /// Book a target for the authenticated tourist.
    async fn book(&self, request: BookingRequest) -> Result<Reservation>;

    /// Admin move of a reservation to a new status.
    async fn set_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> Result<Reservation>;

    /// Tourist cancellation of their own pending reservation.
    async fn cancel_own(&self, id: ReservationId) -> Result<()>;

    /// The authenticated tourist's own reservations.
    async fn list_mine(&self) -> Result<Vec<Reservation>>;

    /// Every reservation on the platform. Admin only.
    async fn list_all(&self) -> Result<Vec<Reservation>>;
}

/// Remote operations on place reviews.
#[async_trait]
pub trait ReviewApi: Send + Sync {
    /// Submit a review for a place.
    async fn submit(&self, draft: ReviewDraft) -> Result<Review>;

    /// Reviews attached to one place.
    async fn list_for_place(&self, place: PlaceId) -> Result<Vec<Review>>;

    /// Every review on the platform. Admin moderation view.
    async fn list_all(&self) -> Result<Vec<Review>>;

    /// Delete a review. Admin only.
    async fn delete(&self, id: ReviewId) -> Result<()>;
}

/// Which slice of the account base a directory list call asks for.
///
/// The backend routes these separately: `/admin/users`, `/admin/guides`
/// and `/admin/tourists`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserGroup {
    /// Every account on the platform.
    All,
    /// Guide accounts only, including PENDING and SUSPENDED ones.
    Guides,
    /// Tourist accounts only.
    Tourists,
}

/// Remote operations on the admin user directory.
///
/// Guide accounts are the moderated ones: status moves and guide
/// deletion go through guide-specific routes, tourist deletion through
/// its own.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// List one slice of the account base.
    async fn list_users(&self, group: UserGroup) -> Result<Vec<Identity>>;

    /// Move a guide account to a new status, returning the updated record.
    async fn set_guide_status(&self, id: UserId, status: AccountStatus) -> Result<Identity>;

    /// Delete a guide account.
    async fn delete_guide(&self, id: UserId) -> Result<()>;

    /// Delete a tourist account.
    async fn delete_tourist(&self, id: UserId) -> Result<()>;

    /// Aggregate account counts for the admin dashboard.
    async fn user_stats(&self) -> Result<UserStats>;
}

/// Remote operations on problem reports.
#[async_trait]
pub trait ReportApi: Send + Sync {
    /// Submit a report.
    async fn submit(&self, draft: ReportDraft) -> Result<Report>;

    /// Every report, newest first. Admin only.
    async fn list_all(&self) -> Result<Vec<Report>>;

    /// Move a report forward in triage.
    async fn set_status(&self, id: ReportId, status: ReportStatus) -> Result<Report>;
}

/// Shared handle to a catalog backend.
pub type SharedCatalogApi = Arc<dyn CatalogApi>;
/// Shared handle to a reservation backend.
pub type SharedReservationApi = Arc<dyn ReservationApi>;
/// Shared handle to a review backend.
pub type SharedReviewApi = Arc<dyn ReviewApi>;
/// Shared handle to a report backend.
pub type SharedReportApi = Arc<dyn ReportApi>;
/// Shared handle to a user directory backend.
pub type SharedDirectoryApi = Arc<dyn DirectoryApi>;
