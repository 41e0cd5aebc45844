//! Reservation endpoints under `/tourist/reservations`.
//!
//! The booking request nests the target as an entity reference under
//! `activity` or `circuit`; exactly one is present. Responses flatten
//! the target into `activityId` or `circuitId`. The admin status move is
//! a PUT with the status in the query string, the tourist cancellation
//! is a DELETE on the reservation.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use taroudant_domain::api::{BookingRequest, ReservationApi};
use taroudant_domain::entity::{ActivityId, CircuitId};
use taroudant_domain::error::{LifecycleError, Result};
use taroudant_domain::types::{
    BookingRef, Reservation, ReservationId, ReservationStatus, UserId,
};

use crate::ApiClient;

/// An entity reference the backend resolves by id.
#[derive(Serialize)]
struct TargetRef {
    id: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BookingBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    activity: Option<TargetRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    circuit: Option<TargetRef>,
    reservation_date: NaiveDate,
}

impl From<BookingRequest> for BookingBody {
    fn from(request: BookingRequest) -> Self {
        let (activity, circuit) = match request.target {
            BookingRef::Activity(id) => (Some(TargetRef { id: id.raw() }), None),
            BookingRef::Circuit(id) => (None, Some(TargetRef { id: id.raw() })),
        };
        Self {
            activity,
            circuit,
            reservation_date: request.reservation_date,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReservationDto {
    id: ReservationId,
    tourist_id: UserId,
    #[serde(default)]
    activity_id: Option<ActivityId>,
    #[serde(default)]
    circuit_id: Option<CircuitId>,
    reservation_date: NaiveDate,
    status: ReservationStatus,
}

impl TryFrom<ReservationDto> for Reservation {
    type Error = LifecycleError;

    fn try_from(dto: ReservationDto) -> Result<Self> {
        let target = match (dto.activity_id, dto.circuit_id) {
            (Some(id), None) => BookingRef::Activity(id),
            (None, Some(id)) => BookingRef::Circuit(id),
            _ => {
                return Err(LifecycleError::Network(
                    "reservation without a single booking target".to_owned(),
                ));
            },
        };
        Ok(Self {
            id: dto.id,
            tourist: dto.tourist_id,
            target,
            reservation_date: dto.reservation_date,
            status: dto.status,
        })
    }
}

#[async_trait]
impl ReservationApi for ApiClient {
    async fn book(&self, request: BookingRequest) -> Result<Reservation> {
        let dto: ReservationDto = self
            .post_json("/tourist/reservations", &BookingBody::from(request))
            .await?;
        dto.try_into()
    }

    async fn set_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> Result<Reservation> {
        let path = format!(
            "/tourist/reservations/{id}/status?status={}",
            status.as_str()
        );
        let dto: ReservationDto = self.put_empty(&path).await?;
        dto.try_into()
    }

    async fn cancel_own(&self, id: ReservationId) -> Result<()> {
        self.delete_path(&format!("/tourist/reservations/{id}")).await
    }

    async fn list_mine(&self) -> Result<Vec<Reservation>> {
        let dtos: Vec<ReservationDto> = self.get_json("/tourist/reservations/my").await?;
        dtos.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_all(&self) -> Result<Vec<Reservation>> {
        let dtos: Vec<ReservationDto> = self.get_json("/tourist/reservations/all").await?;
        dtos.into_iter().map(TryInto::try_into).collect()
    }
}
