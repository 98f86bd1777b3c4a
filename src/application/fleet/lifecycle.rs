//! Trip lifecycle coordinator
//!
//! Drives a request from `pending` to a completed trip:
//!
//! ```text
//! pending --approve--> approved --assign(vehicle)--> assigned --start--> trip active --end--> trip completed
//! pending --reject(reason)--> rejected
//! ```
//!
//! State-changing writes are conditional on the status read here, so a
//! concurrent writer turns into a `Conflict` instead of a lost update.
//! Trip start and end upload the meter photo first and delete it again
//! when the store write that references it fails.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::photo::{photo_object_path, MeterPhoto, PhotoStage, METER_PHOTO_BUCKET};
use crate::application::ports::ObjectStore;
use crate::config::TripsConfig;
use crate::domain::trip::validate_reading;
use crate::domain::{
    Actor, ApprovalStatus, Checkpoint, DomainError, DomainResult, GeoPoint, Profile,
    RepositoryProvider, Trip, TripRequest, Vehicle,
};

/// Evidence submitted by the employee at trip start or end
#[derive(Debug, Clone)]
pub struct TripEvidence {
    pub reading: f64,
    pub photo: MeterPhoto,
    pub location: GeoPoint,
}

/// A request of the caller with its vehicle and trip, if any
#[derive(Debug, Clone)]
pub struct RequestDetails {
    pub request: TripRequest,
    pub vehicle: Option<Vehicle>,
    pub trip: Option<Trip>,
}

/// A queued request with the requester's profile
#[derive(Debug, Clone)]
pub struct QueuedRequest {
    pub request: TripRequest,
    pub requester: Option<Profile>,
}

/// An active trip with the driver and the vehicle
#[derive(Debug, Clone)]
pub struct ActiveTrip {
    pub trip: Trip,
    pub employee: Option<Profile>,
    pub vehicle: Option<Vehicle>,
}

pub struct TripLifecycleService {
    repos: Arc<dyn RepositoryProvider>,
    objects: Arc<dyn ObjectStore>,
    config: TripsConfig,
}

impl TripLifecycleService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        objects: Arc<dyn ObjectStore>,
        config: TripsConfig,
    ) -> Self {
        Self {
            repos,
            objects,
            config,
        }
    }

    async fn load_request(&self, request_id: &str) -> DomainResult<TripRequest> {
        self.repos
            .trip_requests()
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| DomainError::not_found("TripRequest", request_id))
    }

    fn ensure_owner(actor: &Actor, request: &TripRequest) -> DomainResult<()> {
        if request.is_owned_by(&actor.user_id) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "Trip request belongs to another employee".into(),
            ))
        }
    }

    // ── Requests ────────────────────────────────────────────────

    pub async fn create_request(
        &self,
        actor: &Actor,
        destination: &str,
        purpose: &str,
        expected_time: DateTime<Utc>,
    ) -> DomainResult<TripRequest> {
        let request = TripRequest::new(&actor.user_id, destination, purpose, expected_time)?;
        self.repos.trip_requests().save(request.clone()).await?;

        metrics::counter!("fleet_trip_requests_total", "status" => "pending").increment(1);
        info!(request_id = %request.id, employee_id = %actor.user_id, "Trip request submitted");
        Ok(request)
    }

    /// The caller's requests, newest first.
    pub async fn my_requests(&self, actor: &Actor) -> DomainResult<Vec<RequestDetails>> {
        let requests = self
            .repos
            .trip_requests()
            .find_by_employee(&actor.user_id)
            .await?;

        let mut details = Vec::with_capacity(requests.len());
        for request in requests {
            let vehicle = match request.vehicle_id.as_deref() {
                Some(id) => self.repos.vehicles().find_by_id(id).await?,
                None => None,
            };
            let trip = self.repos.trips().find_by_request(&request.id).await?;
            details.push(RequestDetails {
                request,
                vehicle,
                trip,
            });
        }
        Ok(details)
    }

    /// Requests awaiting a decision, oldest first.
    pub async fn pending_requests(&self, actor: &Actor) -> DomainResult<Vec<QueuedRequest>> {
        actor.require_manager()?;
        self.queue(ApprovalStatus::Pending).await
    }

    /// Approved requests awaiting a vehicle, oldest first.
    pub async fn approved_requests(&self, actor: &Actor) -> DomainResult<Vec<QueuedRequest>> {
        actor.require_manager()?;
        self.queue(ApprovalStatus::Approved).await
    }

    async fn queue(&self, status: ApprovalStatus) -> DomainResult<Vec<QueuedRequest>> {
        let requests = self.repos.trip_requests().find_by_status(status).await?;
        let mut queued = Vec::with_capacity(requests.len());
        for request in requests {
            let requester = self.repos.users().find_profile(&request.employee_id).await?;
            queued.push(QueuedRequest { request, requester });
        }
        Ok(queued)
    }

    pub async fn approve(&self, actor: &Actor, request_id: &str) -> DomainResult<TripRequest> {
        actor.require_manager()?;
        let mut request = self.load_request(request_id).await?;
        request.approve(&actor.user_id, Utc::now())?;
        self.repos
            .trip_requests()
            .update_if_status(&request, ApprovalStatus::Pending)
            .await?;

        metrics::counter!("fleet_trip_requests_total", "status" => "approved").increment(1);
        info!(request_id, manager_id = %actor.user_id, "Trip request approved");
        Ok(request)
    }

    pub async fn reject(
        &self,
        actor: &Actor,
        request_id: &str,
        reason: &str,
    ) -> DomainResult<TripRequest> {
        actor.require_manager()?;
        let mut request = self.load_request(request_id).await?;
        request.reject(&actor.user_id, reason, Utc::now())?;
        self.repos
            .trip_requests()
            .update_if_status(&request, ApprovalStatus::Pending)
            .await?;

        metrics::counter!("fleet_trip_requests_total", "status" => "rejected").increment(1);
        info!(request_id, manager_id = %actor.user_id, "Trip request rejected");
        Ok(request)
    }

    /// Bind an available vehicle to an approved request.
    ///
    /// The store applies the vehicle and request updates together; if
    /// another manager took the vehicle first the call fails with
    /// `Conflict` and nothing changes.
    pub async fn assign_vehicle(
        &self,
        actor: &Actor,
        request_id: &str,
        vehicle_id: &str,
    ) -> DomainResult<TripRequest> {
        actor.require_manager()?;
        let mut request = self.load_request(request_id).await?;
        let vehicle = self
            .repos
            .vehicles()
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Vehicle", vehicle_id))?;
        if !vehicle.is_available() {
            return Err(DomainError::Conflict(format!(
                "Vehicle {} is {}",
                vehicle.number_plate, vehicle.status
            )));
        }

        request.assign(&actor.user_id, vehicle_id)?;
        self.repos.trip_requests().commit_assignment(&request).await?;

        metrics::counter!("fleet_trip_requests_total", "status" => "assigned").increment(1);
        info!(
            request_id,
            vehicle_id,
            manager_id = %actor.user_id,
            "Vehicle assigned"
        );
        Ok(request)
    }

    // ── Trips ───────────────────────────────────────────────────

    /// Trip of a request, visible to its owner and to managers.
    pub async fn trip_for_request(
        &self,
        actor: &Actor,
        request_id: &str,
    ) -> DomainResult<Option<Trip>> {
        let request = self.load_request(request_id).await?;
        if !actor.is_manager() {
            Self::ensure_owner(actor, &request)?;
        }
        self.repos.trips().find_by_request(request_id).await
    }

    pub async fn start_trip(
        &self,
        actor: &Actor,
        request_id: &str,
        evidence: TripEvidence,
    ) -> DomainResult<Trip> {
        let request = self.load_request(request_id).await?;
        Self::ensure_owner(actor, &request)?;
        if request.approval_status != ApprovalStatus::Assigned {
            return Err(DomainError::Conflict(format!(
                "Trip request {} is {}, a vehicle must be assigned first",
                request.id, request.approval_status
            )));
        }
        if self.repos.trips().find_by_request(request_id).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Trip for request {} already started",
                request_id
            )));
        }
        validate_reading(evidence.reading)?;
        evidence.photo.validate()?;

        let (path, url) = self
            .upload_photo(actor, request_id, PhotoStage::Start, evidence.photo)
            .await?;
        let checkpoint = Checkpoint {
            reading: evidence.reading,
            photo_url: url,
            location: evidence.location,
            at: Utc::now(),
        };

        let saved = async {
            let trip = Trip::start(&request, checkpoint)?;
            self.repos.trips().save(trip.clone()).await?;
            Ok::<_, DomainError>(trip)
        }
        .await;

        match saved {
            Ok(trip) => {
                metrics::counter!("fleet_trips_total", "status" => "started").increment(1);
                info!(
                    trip_id = %trip.id,
                    request_id,
                    start_reading = trip.start_reading,
                    "Trip started"
                );
                Ok(trip)
            }
            Err(e) => {
                self.discard_photo(&path).await;
                Err(e)
            }
        }
    }

    pub async fn end_trip(
        &self,
        actor: &Actor,
        request_id: &str,
        evidence: TripEvidence,
    ) -> DomainResult<Trip> {
        let request = self.load_request(request_id).await?;
        Self::ensure_owner(actor, &request)?;
        let mut trip = self
            .repos
            .trips()
            .find_by_request(request_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Trip",
                field: "request_id",
                value: request_id.to_string(),
            })?;
        if !trip.is_active() {
            return Err(DomainError::Conflict(format!(
                "Trip {} is already {}",
                trip.id, trip.status
            )));
        }
        validate_reading(evidence.reading)?;
        evidence.photo.validate()?;

        if evidence.reading < trip.start_reading {
            warn!(
                trip_id = %trip.id,
                start_reading = trip.start_reading,
                end_reading = evidence.reading,
                "End reading is below start reading"
            );
            if self.config.reject_negative_distance {
                return Err(DomainError::Validation(format!(
                    "End reading {} is below start reading {}",
                    evidence.reading, trip.start_reading
                )));
            }
        }

        let (path, url) = self
            .upload_photo(actor, request_id, PhotoStage::End, evidence.photo)
            .await?;
        let checkpoint = Checkpoint {
            reading: evidence.reading,
            photo_url: url,
            location: evidence.location,
            at: Utc::now(),
        };

        let saved = async {
            let distance = trip.finish(checkpoint)?;
            self.repos.trips().complete_and_release(&trip).await?;
            Ok::<_, DomainError>(distance)
        }
        .await;

        match saved {
            Ok(distance) => {
                metrics::counter!("fleet_trips_total", "status" => "completed").increment(1);
                metrics::histogram!("fleet_trip_distance_km").record(distance);
                info!(trip_id = %trip.id, request_id, distance, "Trip completed");
                Ok(trip)
            }
            Err(e) => {
                self.discard_photo(&path).await;
                Err(e)
            }
        }
    }

    /// Active trips, most recently started first.
    pub async fn active_trips(&self, actor: &Actor) -> DomainResult<Vec<ActiveTrip>> {
        actor.require_manager()?;
        let trips = self.repos.trips().find_active().await?;
        let mut active = Vec::with_capacity(trips.len());
        for trip in trips {
            let employee = self.repos.users().find_profile(&trip.employee_id).await?;
            let vehicle = self.repos.vehicles().find_by_id(&trip.vehicle_id).await?;
            active.push(ActiveTrip {
                trip,
                employee,
                vehicle,
            });
        }
        Ok(active)
    }

    // ── Photos ──────────────────────────────────────────────────

    async fn upload_photo(
        &self,
        actor: &Actor,
        request_id: &str,
        stage: PhotoStage,
        photo: MeterPhoto,
    ) -> DomainResult<(String, String)> {
        let path = photo_object_path(
            &actor.user_id,
            stage,
            request_id,
            Utc::now().timestamp_millis(),
            &photo.extension(),
        );
        let stored = self
            .objects
            .upload(METER_PHOTO_BUCKET, &path, photo.bytes, &photo.content_type)
            .await?;
        let url = self.objects.public_url(METER_PHOTO_BUCKET, &stored);
        Ok((stored, url))
    }

    async fn discard_photo(&self, path: &str) {
        if let Err(e) = self.objects.delete(METER_PHOTO_BUCKET, path).await {
            warn!(path, error = %e, "Failed to delete orphaned meter photo");
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
