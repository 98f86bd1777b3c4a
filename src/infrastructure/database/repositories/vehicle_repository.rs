//! SeaORM implementation of VehicleRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{corrupt, db_err, unique_err};
use crate::domain::vehicle::{Vehicle, VehicleRepository, VehicleStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::vehicle;

pub struct SeaOrmVehicleRepository {
    db: DatabaseConnection,
}

impl SeaOrmVehicleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn model_to_domain(m: vehicle::Model) -> DomainResult<Vehicle> {
    let status = VehicleStatus::from_str(&m.status)
        .ok_or_else(|| corrupt("vehicle status", &m.status))?;
    Ok(Vehicle {
        id: m.id,
        name: m.name,
        number_plate: m.number_plate,
        description: m.description,
        status,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn active_model(v: Vehicle) -> vehicle::ActiveModel {
    vehicle::ActiveModel {
        id: Set(v.id),
        name: Set(v.name),
        number_plate: Set(v.number_plate),
        description: Set(v.description),
        status: Set(v.status.as_str().to_string()),
        created_at: Set(v.created_at),
        updated_at: Set(v.updated_at),
    }
}

fn duplicate_plate(plate: &str) -> impl FnOnce() -> String + '_ {
    move || format!("Number plate {} is already registered", plate)
}

#[async_trait]
impl VehicleRepository for SeaOrmVehicleRepository {
    async fn save(&self, vehicle: Vehicle) -> DomainResult<()> {
        debug!("Saving vehicle: {} ({})", vehicle.id, vehicle.number_plate);
        let plate = vehicle.number_plate.clone();
        active_model(vehicle)
            .insert(&self.db)
            .await
            .map_err(|e| unique_err(e, duplicate_plate(&plate)))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Vehicle>> {
        let model = vehicle::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_all(&self, status: Option<VehicleStatus>) -> DomainResult<Vec<Vehicle>> {
        let mut query = vehicle::Entity::find();
        if let Some(status) = status {
            query = query.filter(vehicle::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_asc(vehicle::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn update(&self, vehicle: Vehicle, expected: VehicleStatus) -> DomainResult<()> {
        debug!("Updating vehicle: {} (expecting {})", vehicle.id, expected);
        let id = vehicle.id.clone();
        let plate = vehicle.number_plate.clone();
        let result = vehicle::Entity::update_many()
            .col_expr(vehicle::Column::Name, Expr::value(vehicle.name))
            .col_expr(vehicle::Column::NumberPlate, Expr::value(vehicle.number_plate))
            .col_expr(vehicle::Column::Description, Expr::value(vehicle.description))
            .col_expr(vehicle::Column::Status, Expr::value(vehicle.status.as_str()))
            .col_expr(vehicle::Column::UpdatedAt, Expr::value(vehicle.updated_at))
            .filter(vehicle::Column::Id.eq(id.as_str()))
            .filter(vehicle::Column::Status.eq(expected.as_str()))
            .exec(&self.db)
            .await
            .map_err(|e| unique_err(e, duplicate_plate(&plate)))?;
        if result.rows_affected == 1 {
            return Ok(());
        }
        Err(self.miss(&id).await?)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        debug!("Deleting vehicle: {}", id);
        let result = vehicle::Entity::delete_many()
            .filter(vehicle::Column::Id.eq(id))
            .filter(vehicle::Column::Status.ne(VehicleStatus::InUse.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 1 {
            return Ok(());
        }
        Err(self.miss(id).await?)
    }
}

impl SeaOrmVehicleRepository {
    /// Why a conditional write on `id` touched no row.
    async fn miss(&self, id: &str) -> DomainResult<DomainError> {
        let current = vehicle::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(match current {
            None => DomainError::not_found("Vehicle", id),
            Some(m) => DomainError::Conflict(format!(
                "Vehicle {} is now {}",
                m.number_plate, m.status
            )),
        })
    }
}
