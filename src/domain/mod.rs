//! Domain layer
//!
//! Aggregates of the fleet: users, vehicles, trip requests and trips.
//! Each aggregate owns its model and a repository interface; adapters live
//! in `infrastructure`.

pub mod repositories;
pub mod trip;
pub mod trip_request;
pub mod user;
pub mod vehicle;

pub use repositories::{DomainResult, RepositoryProvider};
pub use trip::{Checkpoint, GeoPoint, Trip, TripReportRecord, TripRepository, TripStatus};
pub use trip_request::{ApprovalStatus, TripRequest, TripRequestRepository};
pub use user::{Account, Actor, Identity, Profile, Role, UserRepository};
pub use vehicle::{Vehicle, VehicleChanges, VehicleRepository, VehicleStatus};

pub use crate::shared::errors::DomainError;
