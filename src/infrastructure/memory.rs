//! In-memory repositories for development and testing
//!
//! One store backs all four repository traits so that multi-aggregate
//! writes (assignment, trip completion) can be applied under the entry
//! locks of both maps. Locks are always taken vehicle before request and
//! trip before vehicle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    ApprovalStatus, DomainError, DomainResult, Identity, Profile, RepositoryProvider, Role, Trip,
    TripReportRecord, TripRepository, TripRequest, TripRequestRepository, TripStatus,
    UserRepository, Vehicle, VehicleRepository, VehicleStatus,
};

#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    identities: DashMap<String, Identity>,
    /// email -> identity id
    emails: DashMap<String, String>,
    profiles: DashMap<String, Profile>,
    roles: DashMap<String, Vec<Role>>,
    vehicles: DashMap<String, Vehicle>,
    requests: DashMap<String, TripRequest>,
    /// keyed by request id
    trips: DashMap<String, Trip>,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn assign(&self, request: &TripRequest) -> DomainResult<()> {
        let vehicle_id = request.vehicle_id.as_deref().ok_or_else(|| {
            DomainError::Validation(format!("Trip request {} has no vehicle", request.id))
        })?;

        let mut vehicle = self
            .vehicles
            .get_mut(vehicle_id)
            .ok_or_else(|| DomainError::not_found("Vehicle", vehicle_id))?;
        if vehicle.status != VehicleStatus::Available {
            return Err(DomainError::Conflict(format!(
                "Vehicle {} is no longer available",
                vehicle.number_plate
            )));
        }

        let mut stored = self
            .requests
            .get_mut(&request.id)
            .ok_or_else(|| DomainError::not_found("TripRequest", &request.id))?;
        if stored.approval_status != ApprovalStatus::Approved {
            return Err(DomainError::Conflict(format!(
                "Trip request {} is no longer approved",
                request.id
            )));
        }

        vehicle.status = VehicleStatus::InUse;
        vehicle.updated_at = Utc::now();
        *stored = request.clone();
        Ok(())
    }

    fn complete(&self, trip: &Trip) -> DomainResult<()> {
        let mut stored = self.trips.get_mut(&trip.request_id).ok_or_else(|| {
            DomainError::NotFound {
                entity: "Trip",
                field: "request_id",
                value: trip.request_id.clone(),
            }
        })?;
        if stored.status != TripStatus::Active {
            return Err(DomainError::Conflict(format!(
                "Trip {} is already {}",
                trip.id, stored.status
            )));
        }

        *stored = trip.clone();
        if let Some(mut vehicle) = self.vehicles.get_mut(&trip.vehicle_id) {
            vehicle.status = VehicleStatus::Available;
            vehicle.updated_at = Utc::now();
        }
        Ok(())
    }

    fn report_record(&self, trip: &Trip) -> TripReportRecord {
        let vehicle = self.vehicles.get(&trip.vehicle_id).map(|v| v.clone());
        let profile = self.profiles.get(&trip.employee_id).map(|p| p.clone());
        let request = self.requests.get(&trip.request_id).map(|r| r.clone());
        TripReportRecord::compose(trip, vehicle.as_ref(), profile.as_ref(), request.as_ref())
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn vehicles(&self) -> &dyn VehicleRepository {
        self
    }

    fn trip_requests(&self) -> &dyn TripRequestRepository {
        self
    }

    fn trips(&self) -> &dyn TripRepository {
        self
    }
}

// ── Users ──────────────────────────────────────────────────────

#[async_trait]
impl UserRepository for InMemoryRepositoryProvider {
    async fn create_identity(&self, identity: Identity) -> DomainResult<()> {
        match self.emails.entry(identity.email.clone()) {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!(
                "A user with email {} has already been registered",
                identity.email
            ))),
            Entry::Vacant(slot) => {
                slot.insert(identity.id.clone());
                self.identities.insert(identity.id.clone(), identity);
                Ok(())
            }
        }
    }

    async fn find_identity_by_email(&self, email: &str) -> DomainResult<Option<Identity>> {
        let id = self.emails.get(email).map(|id| id.clone());
        Ok(id.and_then(|id| self.identities.get(&id).map(|i| i.clone())))
    }

    async fn delete_identity(&self, id: &str) -> DomainResult<()> {
        if let Some((_, identity)) = self.identities.remove(id) {
            self.emails.remove(&identity.email);
        }
        self.roles.remove(id);
        Ok(())
    }

    async fn count_identities(&self) -> DomainResult<u64> {
        Ok(self.identities.len() as u64)
    }

    async fn create_profile(&self, profile: Profile) -> DomainResult<()> {
        match self.profiles.entry(profile.id.clone()) {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!(
                "Profile {} already exists",
                profile.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(profile);
                Ok(())
            }
        }
    }

    async fn find_profile(&self, id: &str) -> DomainResult<Option<Profile>> {
        Ok(self.profiles.get(id).map(|p| p.clone()))
    }

    async fn list_profiles(&self) -> DomainResult<Vec<Profile>> {
        let mut profiles: Vec<Profile> = self.profiles.iter().map(|p| p.clone()).collect();
        profiles.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(profiles)
    }

    async fn delete_profile(&self, id: &str) -> DomainResult<()> {
        self.profiles.remove(id);
        Ok(())
    }

    async fn roles_for(&self, user_id: &str) -> DomainResult<Vec<Role>> {
        Ok(self
            .roles
            .get(user_id)
            .map(|r| r.clone())
            .unwrap_or_default())
    }

    async fn clear_roles(&self, user_id: &str) -> DomainResult<u64> {
        Ok(self
            .roles
            .remove(user_id)
            .map_or(0, |(_, roles)| roles.len() as u64))
    }

    async fn add_role(&self, user_id: &str, role: Role) -> DomainResult<()> {
        let mut roles = self.roles.entry(user_id.to_string()).or_default();
        if !roles.contains(&role) {
            roles.push(role);
        }
        Ok(())
    }
}

// ── Vehicles ───────────────────────────────────────────────────

#[async_trait]
impl VehicleRepository for InMemoryRepositoryProvider {
    async fn save(&self, vehicle: Vehicle) -> DomainResult<()> {
        if self
            .vehicles
            .iter()
            .any(|v| v.number_plate == vehicle.number_plate)
        {
            return Err(DomainError::Conflict(format!(
                "Number plate {} is already registered",
                vehicle.number_plate
            )));
        }
        self.vehicles.insert(vehicle.id.clone(), vehicle);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Vehicle>> {
        Ok(self.vehicles.get(id).map(|v| v.clone()))
    }

    async fn find_all(&self, status: Option<VehicleStatus>) -> DomainResult<Vec<Vehicle>> {
        let mut vehicles: Vec<Vehicle> = self
            .vehicles
            .iter()
            .filter(|v| status.map_or(true, |s| v.status == s))
            .map(|v| v.clone())
            .collect();
        vehicles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(vehicles)
    }

    async fn update(&self, vehicle: Vehicle, expected: VehicleStatus) -> DomainResult<()> {
        if self
            .vehicles
            .iter()
            .any(|v| v.id != vehicle.id && v.number_plate == vehicle.number_plate)
        {
            return Err(DomainError::Conflict(format!(
                "Number plate {} is already registered",
                vehicle.number_plate
            )));
        }
        let mut stored = self
            .vehicles
            .get_mut(&vehicle.id)
            .ok_or_else(|| DomainError::not_found("Vehicle", &vehicle.id))?;
        if stored.status != expected {
            return Err(DomainError::Conflict(format!(
                "Vehicle {} is now {}",
                stored.number_plate, stored.status
            )));
        }
        *stored = vehicle;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        if self
            .vehicles
            .remove_if(id, |_, v| v.status != VehicleStatus::InUse)
            .is_some()
        {
            return Ok(());
        }
        match self.vehicles.get(id) {
            Some(v) => Err(DomainError::Conflict(format!(
                "Vehicle {} is in use",
                v.number_plate
            ))),
            None => Err(DomainError::not_found("Vehicle", id)),
        }
    }
}

// ── Trip requests ──────────────────────────────────────────────

#[async_trait]
impl TripRequestRepository for InMemoryRepositoryProvider {
    async fn save(&self, request: TripRequest) -> DomainResult<()> {
        self.requests.insert(request.id.clone(), request);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<TripRequest>> {
        Ok(self.requests.get(id).map(|r| r.clone()))
    }

    async fn find_by_employee(&self, employee_id: &str) -> DomainResult<Vec<TripRequest>> {
        let mut requests: Vec<TripRequest> = self
            .requests
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .map(|r| r.clone())
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn find_by_status(&self, status: ApprovalStatus) -> DomainResult<Vec<TripRequest>> {
        let mut requests: Vec<TripRequest> = self
            .requests
            .iter()
            .filter(|r| r.approval_status == status)
            .map(|r| r.clone())
            .collect();
        requests.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(requests)
    }

    async fn update_if_status(
        &self,
        request: &TripRequest,
        expected: ApprovalStatus,
    ) -> DomainResult<()> {
        let mut stored = self
            .requests
            .get_mut(&request.id)
            .ok_or_else(|| DomainError::not_found("TripRequest", &request.id))?;
        if stored.approval_status != expected {
            return Err(DomainError::Conflict(format!(
                "Trip request {} is {}, expected {}",
                request.id, stored.approval_status, expected
            )));
        }
        *stored = request.clone();
        Ok(())
    }

    async fn commit_assignment(&self, request: &TripRequest) -> DomainResult<()> {
        self.assign(request)
    }
}

// ── Trips ──────────────────────────────────────────────────────

#[async_trait]
impl TripRepository for InMemoryRepositoryProvider {
    async fn save(&self, trip: Trip) -> DomainResult<()> {
        match self.trips.entry(trip.request_id.clone()) {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!(
                "Trip for request {} already exists",
                trip.request_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(trip);
                Ok(())
            }
        }
    }

    async fn find_by_request(&self, request_id: &str) -> DomainResult<Option<Trip>> {
        Ok(self.trips.get(request_id).map(|t| t.clone()))
    }

    async fn find_by_employee(&self, employee_id: &str) -> DomainResult<Vec<Trip>> {
        let mut trips: Vec<Trip> = self
            .trips
            .iter()
            .filter(|t| t.employee_id == employee_id)
            .map(|t| t.clone())
            .collect();
        trips.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(trips)
    }

    async fn find_active(&self) -> DomainResult<Vec<Trip>> {
        let mut trips: Vec<Trip> = self
            .trips
            .iter()
            .filter(|t| t.status == TripStatus::Active)
            .map(|t| t.clone())
            .collect();
        trips.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(trips)
    }

    async fn complete_and_release(&self, trip: &Trip) -> DomainResult<()> {
        self.complete(trip)
    }

    async fn find_report_records(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<TripReportRecord>> {
        let trips: Vec<Trip> = self
            .trips
            .iter()
            .filter(|t| t.start_time >= from && t.start_time <= to)
            .map(|t| t.clone())
            .collect();
        let mut records: Vec<TripReportRecord> =
            trips.iter().map(|t| self.report_record(t)).collect();
        records.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trip::UNKNOWN_EMPLOYEE;

    fn approved(employee: &str) -> TripRequest {
        let mut r = TripRequest::new(employee, "Site", "Audit", Utc::now()).unwrap();
        r.approve("mgr", Utc::now()).unwrap();
        r
    }

    #[tokio::test]
    async fn assignment_is_all_or_nothing() {
        let repos = InMemoryRepositoryProvider::new();
        let vehicle = Vehicle::new("Van", "KA-1", None).unwrap();
        repos.vehicles().save(vehicle.clone()).await.unwrap();

        let mut first = approved("e1");
        let mut second = approved("e2");
        repos.trip_requests().save(first.clone()).await.unwrap();
        repos.trip_requests().save(second.clone()).await.unwrap();

        first.assign("mgr", &vehicle.id).unwrap();
        repos.trip_requests().commit_assignment(&first).await.unwrap();

        second.assign("mgr", &vehicle.id).unwrap();
        let err = repos
            .trip_requests()
            .commit_assignment(&second)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let stored = repos.trip_requests().find_by_id(&second.id).await.unwrap().unwrap();
        assert_eq!(stored.approval_status, ApprovalStatus::Approved);
        assert!(stored.vehicle_id.is_none());
    }

    #[tokio::test]
    async fn stale_decision_conflicts() {
        let repos = InMemoryRepositoryProvider::new();
        let request = TripRequest::new("e1", "Site", "Audit", Utc::now()).unwrap();
        repos.trip_requests().save(request.clone()).await.unwrap();

        let mut approve = request.clone();
        approve.approve("m1", Utc::now()).unwrap();
        let mut reject = request.clone();
        reject.reject("m2", "No budget", Utc::now()).unwrap();

        repos
            .trip_requests()
            .update_if_status(&approve, ApprovalStatus::Pending)
            .await
            .unwrap();
        assert!(repos
            .trip_requests()
            .update_if_status(&reject, ApprovalStatus::Pending)
            .await
            .is_err());
        let stored = repos.trip_requests().find_by_id(&request.id).await.unwrap().unwrap();
        assert_eq!(stored.approval_status, ApprovalStatus::Approved);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let repos = InMemoryRepositoryProvider::new();
        repos
            .users()
            .create_identity(Identity::new("a@b.c", "hash"))
            .await
            .unwrap();
        let err = repos
            .users()
            .create_identity(Identity::new("a@b.c", "hash"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn report_records_default_missing_joins() {
        let repos = InMemoryRepositoryProvider::new();
        let vehicle = Vehicle::new("Van", "KA-1", None).unwrap();
        repos.vehicles().save(vehicle.clone()).await.unwrap();
        let mut request = approved("ghost");
        repos.trip_requests().save(request.clone()).await.unwrap();
        request.assign("mgr", &vehicle.id).unwrap();
        repos.trip_requests().commit_assignment(&request).await.unwrap();

        let trip = Trip::start(
            &request,
            crate::domain::Checkpoint {
                reading: 10.0,
                photo_url: "u".into(),
                location: crate::domain::GeoPoint::new(0.0, 0.0).unwrap(),
                at: Utc::now(),
            },
        )
        .unwrap();
        repos.trips().save(trip.clone()).await.unwrap();
        assert!(repos.trips().save(trip.clone()).await.is_err());

        let records = repos
            .trips()
            .find_report_records(Utc::now() - chrono::Duration::hours(1), Utc::now())
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].employee_name, UNKNOWN_EMPLOYEE);
        assert_eq!(records[0].employee_email, "-");
        assert_eq!(records[0].vehicle_name, "Van");
        assert_eq!(records[0].approval_status, ApprovalStatus::Assigned);
    }
}
