//! Vehicle repository interface

use async_trait::async_trait;

use super::model::{Vehicle, VehicleStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Fails with `Conflict` on a duplicate number plate.
    async fn save(&self, vehicle: Vehicle) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Vehicle>>;
    /// Vehicles ordered by name, optionally narrowed to one status.
    async fn find_all(&self, status: Option<VehicleStatus>) -> DomainResult<Vec<Vehicle>>;
    /// Writes `vehicle` only while the stored status is still `expected`;
    /// `Conflict` when an assignment or release got there first.
    async fn update(&self, vehicle: Vehicle, expected: VehicleStatus) -> DomainResult<()>;
    /// `Conflict` while the vehicle is `in_use`.
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
