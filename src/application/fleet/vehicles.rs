//! Vehicle fleet management

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    Actor, DomainError, DomainResult, RepositoryProvider, Vehicle, VehicleChanges, VehicleStatus,
};

pub struct VehicleService {
    repos: Arc<dyn RepositoryProvider>,
}

impl VehicleService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Vehicles ordered by name, optionally narrowed to one status.
    pub async fn list(
        &self,
        actor: &Actor,
        status: Option<VehicleStatus>,
    ) -> DomainResult<Vec<Vehicle>> {
        actor.require_manager()?;
        self.repos.vehicles().find_all(status).await
    }

    pub async fn get(&self, actor: &Actor, id: &str) -> DomainResult<Vehicle> {
        actor.require_manager()?;
        self.load(id).await
    }

    pub async fn create(
        &self,
        actor: &Actor,
        name: &str,
        number_plate: &str,
        description: Option<String>,
    ) -> DomainResult<Vehicle> {
        actor.require_manager()?;
        let vehicle = Vehicle::new(name, number_plate, description)?;
        self.repos.vehicles().save(vehicle.clone()).await?;
        info!(vehicle_id = %vehicle.id, number_plate = %vehicle.number_plate, "Vehicle added");
        Ok(vehicle)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        changes: VehicleChanges,
    ) -> DomainResult<Vehicle> {
        actor.require_manager()?;
        let mut vehicle = self.load(id).await?;
        let read_status = vehicle.status;
        vehicle.apply(changes)?;
        // an assignment committed since the read turns this into a Conflict
        self.repos
            .vehicles()
            .update(vehicle.clone(), read_status)
            .await?;
        info!(vehicle_id = %vehicle.id, status = %vehicle.status, "Vehicle updated");
        Ok(vehicle)
    }

    /// Vehicles out on an assignment cannot be removed.
    pub async fn delete(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        actor.require_manager()?;
        self.repos.vehicles().delete(id).await?;
        info!(vehicle_id = %id, "Vehicle deleted");
        Ok(())
    }

    async fn load(&self, id: &str) -> DomainResult<Vehicle> {
        self.repos
            .vehicles()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Vehicle", id))
    }
}
