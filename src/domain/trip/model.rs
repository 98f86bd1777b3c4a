//! Trip domain entity
//!
//! Trip layer of the lifecycle, created only for an `assigned` request:
//!
//! ```text
//! (none) --start(reading, photo, location)--> active --end(reading, photo, location)--> completed
//! ```

use chrono::{DateTime, Utc};

use crate::domain::trip_request::{ApprovalStatus, TripRequest};
use crate::domain::user::Profile;
use crate::domain::vehicle::Vehicle;
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripStatus {
    Active,
    Completed,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Device position reported with a trip checkpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> DomainResult<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::Validation(format!("Invalid latitude: {}", lat)));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(DomainError::Validation(format!("Invalid longitude: {}", lng)));
        }
        Ok(Self { lat, lng })
    }
}

/// Odometer evidence captured at trip start or end
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    /// Odometer reading in km
    pub reading: f64,
    /// Public URL of the uploaded meter photo
    pub photo_url: String,
    pub location: GeoPoint,
    pub at: DateTime<Utc>,
}

/// Validate an odometer reading in km.
pub fn validate_reading(reading: f64) -> DomainResult<f64> {
    if !reading.is_finite() || reading < 0.0 {
        return Err(DomainError::Validation(format!(
            "Invalid odometer reading: {}",
            reading
        )));
    }
    Ok(reading)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub id: String,
    pub request_id: String,
    pub employee_id: String,
    pub vehicle_id: String,
    pub status: TripStatus,
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
    /// Kilometres driven, `end_reading - start_reading`
    pub distance: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Trip {
    /// Open an active trip for an assigned request.
    pub fn start(request: &TripRequest, checkpoint: Checkpoint) -> DomainResult<Self> {
        if request.approval_status != ApprovalStatus::Assigned {
            return Err(DomainError::Conflict(format!(
                "Trip request {} is {}, a vehicle must be assigned first",
                request.id, request.approval_status
            )));
        }
        let Some(vehicle_id) = request.vehicle_id.clone() else {
            return Err(DomainError::Conflict(format!(
                "Trip request {} has no vehicle",
                request.id
            )));
        };
        let reading = validate_reading(checkpoint.reading)?;

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            request_id: request.id.clone(),
            employee_id: request.employee_id.clone(),
            vehicle_id,
            status: TripStatus::Active,
            start_time: checkpoint.at,
            start_reading: reading,
            start_meter_photo: checkpoint.photo_url,
            start_location_lat: checkpoint.location.lat,
            start_location_lng: checkpoint.location.lng,
            end_time: None,
            end_reading: None,
            end_meter_photo: None,
            end_location_lat: None,
            end_location_lng: None,
            distance: None,
            created_at: Utc::now(),
        })
    }

    /// Close the trip and return the distance driven.
    ///
    /// The distance is `end - start` exactly; a reading below the start
    /// yields a negative distance, which callers decide how to treat.
    pub fn finish(&mut self, checkpoint: Checkpoint) -> DomainResult<f64> {
        if self.status != TripStatus::Active {
            return Err(DomainError::Conflict(format!(
                "Trip {} is already {}",
                self.id, self.status
            )));
        }
        let reading = validate_reading(checkpoint.reading)?;
        let distance = reading - self.start_reading;

        self.status = TripStatus::Completed;
        self.end_time = Some(checkpoint.at);
        self.end_reading = Some(reading);
        self.end_meter_photo = Some(checkpoint.photo_url);
        self.end_location_lat = Some(checkpoint.location.lat);
        self.end_location_lng = Some(checkpoint.location.lng);
        self.distance = Some(distance);
        Ok(distance)
    }

    pub fn is_active(&self) -> bool {
        self.status == TripStatus::Active
    }

    pub fn start_location(&self) -> GeoPoint {
        GeoPoint {
            lat: self.start_location_lat,
            lng: self.start_location_lng,
        }
    }

    pub fn end_location(&self) -> Option<GeoPoint> {
        match (self.end_location_lat, self.end_location_lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        }
    }
}

/// One trip joined with its request, vehicle and employee, as read by reports
#[derive(Debug, Clone, PartialEq)]
pub struct TripReportRecord {
    pub trip_id: String,
    pub vehicle_name: String,
    pub vehicle_number_plate: String,
    pub employee_name: String,
    pub employee_email: String,
    pub purpose: String,
    pub destination: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub distance: Option<f64>,
    pub status: TripStatus,
    pub approval_status: ApprovalStatus,
    pub start_reading: Option<f64>,
    pub end_reading: Option<f64>,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Placeholder used when a trip's vehicle row is gone
pub const UNASSIGNED_VEHICLE: &str = "Not Assigned";
/// Placeholder used when a trip's employee profile is gone
pub const UNKNOWN_EMPLOYEE: &str = "Unknown";
const MISSING: &str = "-";

impl TripReportRecord {
    /// Join a trip with whatever related rows still exist.
    pub fn compose(
        trip: &Trip,
        vehicle: Option<&Vehicle>,
        employee: Option<&Profile>,
        request: Option<&TripRequest>,
    ) -> Self {
        Self {
            trip_id: trip.id.clone(),
            vehicle_name: vehicle.map_or_else(|| UNASSIGNED_VEHICLE.to_string(), |v| v.name.clone()),
            vehicle_number_plate: vehicle
                .map_or_else(|| MISSING.to_string(), |v| v.number_plate.clone()),
            employee_name: employee
                .map_or_else(|| UNKNOWN_EMPLOYEE.to_string(), |p| p.full_name.clone()),
            employee_email: employee.map_or_else(|| MISSING.to_string(), |p| p.email.clone()),
            purpose: request.map_or_else(|| MISSING.to_string(), |r| r.purpose.clone()),
            destination: request.map_or_else(|| MISSING.to_string(), |r| r.destination.clone()),
            start_time: trip.start_time,
            end_time: trip.end_time,
            distance: trip.distance,
            status: trip.status,
            approval_status: request.map_or(ApprovalStatus::Pending, |r| r.approval_status),
            start_reading: Some(trip.start_reading),
            end_reading: trip.end_reading,
            approved_by: request.and_then(|r| r.approved_by.clone()),
            approved_at: request.and_then(|r| r.approved_at),
            rejection_reason: request.and_then(|r| r.rejection_reason.clone()),
            created_at: trip.created_at,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
