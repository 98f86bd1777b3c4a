//! Trip DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::fleet::ActiveTrip;
use crate::domain::{Profile, Trip};
use crate::interfaces::http::modules::vehicles::VehicleDto;

/// Trip API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TripDto {
    pub id: String,
    pub request_id: String,
    pub employee_id: String,
    pub vehicle_id: String,
    /// `active` or `completed`
    pub status: String,
    pub start_time: DateTime<Utc>,
    pub start_reading: f64,
    pub start_meter_photo: String,
    pub start_location_lat: f64,
    pub start_location_lng: f64,
    pub end_time: Option<DateTime<Utc>>,
    pub end_reading: Option<f64>,
    pub end_meter_photo: Option<String>,
    pub end_location_lat: Option<f64>,
    pub end_location_lng: Option<f64>,
    /// Kilometres, `end_reading - start_reading`
    pub distance: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<Trip> for TripDto {
    fn from(t: Trip) -> Self {
        Self {
            id: t.id,
            request_id: t.request_id,
            employee_id: t.employee_id,
            vehicle_id: t.vehicle_id,
            status: t.status.as_str().to_string(),
            start_time: t.start_time,
            start_reading: t.start_reading,
            start_meter_photo: t.start_meter_photo,
            start_location_lat: t.start_location_lat,
            start_location_lng: t.start_location_lng,
            end_time: t.end_time,
            end_reading: t.end_reading,
            end_meter_photo: t.end_meter_photo,
            end_location_lat: t.end_location_lat,
            end_location_lng: t.end_location_lng,
            distance: t.distance,
            created_at: t.created_at,
        }
    }
}

/// Name and contact of a requester or driver
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PersonDto {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<Profile> for PersonDto {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            full_name: p.full_name,
            email: p.email,
            phone: p.phone,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActiveTripDto {
    pub trip: TripDto,
    pub employee: Option<PersonDto>,
    pub vehicle: Option<VehicleDto>,
}

impl From<ActiveTrip> for ActiveTripDto {
    fn from(a: ActiveTrip) -> Self {
        Self {
            trip: a.trip.into(),
            employee: a.employee.map(PersonDto::from),
            vehicle: a.vehicle.map(VehicleDto::from),
        }
    }
}
