//! Trip request DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::fleet::{MeterPhoto, QueuedRequest, RequestDetails, TripEvidence};
use crate::domain::{DomainResult, GeoPoint, TripRequest};
use crate::interfaces::http::modules::trips::{PersonDto, TripDto};
use crate::interfaces::http::modules::vehicles::VehicleDto;

/// Trip request API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TripRequestDto {
    pub id: String,
    pub employee_id: String,
    pub vehicle_id: Option<String>,
    pub destination: String,
    pub purpose: String,
    pub expected_time: DateTime<Utc>,
    /// `pending`, `approved`, `assigned` or `rejected`
    pub approval_status: String,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub assigned_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<TripRequest> for TripRequestDto {
    fn from(r: TripRequest) -> Self {
        Self {
            id: r.id,
            employee_id: r.employee_id,
            vehicle_id: r.vehicle_id,
            destination: r.destination,
            purpose: r.purpose,
            expected_time: r.expected_time,
            approval_status: r.approval_status.as_str().to_string(),
            approved_by: r.approved_by,
            approved_at: r.approved_at,
            assigned_by: r.assigned_by,
            rejection_reason: r.rejection_reason,
            created_at: r.created_at,
        }
    }
}

/// One of the caller's requests with its vehicle and trip
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MyTripRequestDto {
    pub request: TripRequestDto,
    pub vehicle: Option<VehicleDto>,
    pub trip: Option<TripDto>,
}

impl From<RequestDetails> for MyTripRequestDto {
    fn from(d: RequestDetails) -> Self {
        Self {
            request: d.request.into(),
            vehicle: d.vehicle.map(VehicleDto::from),
            trip: d.trip.map(TripDto::from),
        }
    }
}

/// A request in the manager queue
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QueuedRequestDto {
    pub request: TripRequestDto,
    pub requester: Option<PersonDto>,
}

impl From<QueuedRequest> for QueuedRequestDto {
    fn from(q: QueuedRequest) -> Self {
        Self {
            request: q.request.into(),
            requester: q.requester.map(PersonDto::from),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTripRequestRequest {
    #[validate(length(min = 1, max = 200, message = "destination is required"))]
    pub destination: String,
    #[validate(length(min = 1, max = 500, message = "purpose is required"))]
    pub purpose: String,
    pub expected_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RejectTripRequestRequest {
    #[validate(length(min = 1, max = 500, message = "a rejection reason is required"))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignVehicleRequest {
    #[validate(length(min = 1, message = "vehicle_id is required"))]
    pub vehicle_id: String,
}

/// Odometer reading, meter photo and device position at trip start or end
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TripCheckpointRequest {
    pub reading: f64,
    /// Base64 image, optionally as a `data:image/...;base64,` URL
    #[validate(length(min = 1, message = "a meter photo is required"))]
    pub photo: String,
    /// Used when `photo` is plain base64; defaults to `image/jpeg`
    pub photo_content_type: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl TripCheckpointRequest {
    pub fn into_evidence(self) -> DomainResult<TripEvidence> {
        let photo = MeterPhoto::from_base64(&self.photo, self.photo_content_type.as_deref())?;
        let location = GeoPoint::new(self.latitude, self.longitude)?;
        Ok(TripEvidence {
            reading: self.reading,
            photo,
            location,
        })
    }
}
