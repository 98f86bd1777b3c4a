//! SeaORM implementation of TripRequestRepository
//!
//! Status changes are written as conditional updates (`... WHERE
//! approval_status = <expected>`) so two managers acting on the same
//! request cannot both win.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::{corrupt, db_err};
use crate::domain::trip_request::{ApprovalStatus, TripRequest, TripRequestRepository};
use crate::domain::vehicle::VehicleStatus;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{trip_request, vehicle};

pub struct SeaOrmTripRequestRepository {
    db: DatabaseConnection,
}

impl SeaOrmTripRequestRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Explain why a conditional update touched no row.
    async fn miss<C: ConnectionTrait>(
        conn: &C,
        id: &str,
        expected: ApprovalStatus,
    ) -> DomainResult<DomainError> {
        let stored = trip_request::Entity::find_by_id(id.to_string())
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(match stored {
            None => DomainError::not_found("TripRequest", id),
            Some(m) => DomainError::Conflict(format!(
                "Trip request {} is {}, expected {}",
                id, m.approval_status, expected
            )),
        })
    }
}

pub(crate) fn model_to_domain(m: trip_request::Model) -> DomainResult<TripRequest> {
    let approval_status = ApprovalStatus::from_str(&m.approval_status)
        .ok_or_else(|| corrupt("approval status", &m.approval_status))?;
    Ok(TripRequest {
        id: m.id,
        employee_id: m.employee_id,
        vehicle_id: m.vehicle_id,
        destination: m.destination,
        purpose: m.purpose,
        expected_time: m.expected_time,
        approval_status,
        approved_by: m.approved_by,
        approved_at: m.approved_at,
        assigned_by: m.assigned_by,
        rejection_reason: m.rejection_reason,
        created_at: m.created_at,
    })
}

fn active_model(r: &TripRequest) -> trip_request::ActiveModel {
    trip_request::ActiveModel {
        id: Set(r.id.clone()),
        employee_id: Set(r.employee_id.clone()),
        vehicle_id: Set(r.vehicle_id.clone()),
        destination: Set(r.destination.clone()),
        purpose: Set(r.purpose.clone()),
        expected_time: Set(r.expected_time),
        approval_status: Set(r.approval_status.as_str().to_string()),
        approved_by: Set(r.approved_by.clone()),
        approved_at: Set(r.approved_at),
        assigned_by: Set(r.assigned_by.clone()),
        rejection_reason: Set(r.rejection_reason.clone()),
        created_at: Set(r.created_at),
    }
}

/// `UPDATE trip_requests SET ... WHERE id = ? AND approval_status = ?`
async fn conditional_update<C: ConnectionTrait>(
    conn: &C,
    request: &TripRequest,
    expected: ApprovalStatus,
) -> DomainResult<u64> {
    let result = trip_request::Entity::update_many()
        .set(active_model(request))
        .filter(trip_request::Column::Id.eq(request.id.as_str()))
        .filter(trip_request::Column::ApprovalStatus.eq(expected.as_str()))
        .exec(conn)
        .await
        .map_err(db_err)?;
    Ok(result.rows_affected)
}

#[async_trait]
impl TripRequestRepository for SeaOrmTripRequestRepository {
    async fn save(&self, request: TripRequest) -> DomainResult<()> {
        debug!("Saving trip request: {}", request.id);
        active_model(&request)
            .insert(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<TripRequest>> {
        let model = trip_request::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_by_employee(&self, employee_id: &str) -> DomainResult<Vec<TripRequest>> {
        let models = trip_request::Entity::find()
            .filter(trip_request::Column::EmployeeId.eq(employee_id))
            .order_by_desc(trip_request::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_by_status(&self, status: ApprovalStatus) -> DomainResult<Vec<TripRequest>> {
        let models = trip_request::Entity::find()
            .filter(trip_request::Column::ApprovalStatus.eq(status.as_str()))
            .order_by_asc(trip_request::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn update_if_status(
        &self,
        request: &TripRequest,
        expected: ApprovalStatus,
    ) -> DomainResult<()> {
        debug!(
            "Updating trip request {}: {} -> {}",
            request.id, expected, request.approval_status
        );
        if conditional_update(&self.db, request, expected).await? == 1 {
            return Ok(());
        }
        Err(Self::miss(&self.db, &request.id, expected).await?)
    }

    async fn commit_assignment(&self, request: &TripRequest) -> DomainResult<()> {
        let vehicle_id = request.vehicle_id.as_deref().ok_or_else(|| {
            DomainError::Validation(format!("Trip request {} has no vehicle", request.id))
        })?;
        debug!("Assigning vehicle {} to trip request {}", vehicle_id, request.id);

        let txn = self.db.begin().await.map_err(db_err)?;

        let claimed = vehicle::Entity::update_many()
            .col_expr(
                vehicle::Column::Status,
                Expr::value(VehicleStatus::InUse.as_str()),
            )
            .col_expr(vehicle::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(vehicle::Column::Id.eq(vehicle_id))
            .filter(vehicle::Column::Status.eq(VehicleStatus::Available.as_str()))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if claimed.rows_affected != 1 {
            txn.rollback().await.map_err(db_err)?;
            let exists = vehicle::Entity::find_by_id(vehicle_id.to_string())
                .one(&self.db)
                .await
                .map_err(db_err)?
                .is_some();
            return Err(if exists {
                DomainError::Conflict(format!("Vehicle {} is no longer available", vehicle_id))
            } else {
                DomainError::not_found("Vehicle", vehicle_id)
            });
        }

        if conditional_update(&txn, request, ApprovalStatus::Approved).await? != 1 {
            txn.rollback().await.map_err(db_err)?;
            return Err(Self::miss(&self.db, &request.id, ApprovalStatus::Approved).await?);
        }

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }
}
