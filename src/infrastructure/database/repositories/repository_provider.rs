//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::repositories::RepositoryProvider;
use crate::domain::trip::TripRepository;
use crate::domain::trip_request::TripRequestRepository;
use crate::domain::user::UserRepository;
use crate::domain::vehicle::VehicleRepository;

use super::trip_repository::SeaOrmTripRepository;
use super::trip_request_repository::SeaOrmTripRequestRepository;
use super::user_repository::SeaOrmUserRepository;
use super::vehicle_repository::SeaOrmVehicleRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let queue = repos.trip_requests().find_by_status(ApprovalStatus::Pending).await?;
/// let active = repos.trips().find_active().await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    vehicles: SeaOrmVehicleRepository,
    trip_requests: SeaOrmTripRequestRepository,
    trips: SeaOrmTripRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            vehicles: SeaOrmVehicleRepository::new(db.clone()),
            trip_requests: SeaOrmTripRequestRepository::new(db.clone()),
            trips: SeaOrmTripRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn vehicles(&self) -> &dyn VehicleRepository {
        &self.vehicles
    }

    fn trip_requests(&self) -> &dyn TripRequestRepository {
        &self.trip_requests
    }

    fn trips(&self) -> &dyn TripRepository {
        &self.trips
    }
}
