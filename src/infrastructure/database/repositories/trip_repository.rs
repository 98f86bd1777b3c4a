//! SeaORM implementation of TripRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::{corrupt, db_err, unique_err};
use crate::domain::trip::{Trip, TripReportRecord, TripRepository, TripStatus};
use crate::domain::user::Profile;
use crate::domain::vehicle::VehicleStatus;
use crate::domain::{DomainError, DomainResult, TripRequest, Vehicle};
use crate::infrastructure::database::entities::{profile, trip, trip_request, vehicle};

use super::trip_request_repository::model_to_domain as request_to_domain;
use super::user_repository::profile_to_domain;
use super::vehicle_repository::model_to_domain as vehicle_to_domain;

pub struct SeaOrmTripRepository {
    db: DatabaseConnection,
}

impl SeaOrmTripRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: trip::Model) -> DomainResult<Trip> {
    let status =
        TripStatus::from_str(&m.status).ok_or_else(|| corrupt("trip status", &m.status))?;
    Ok(Trip {
        id: m.id,
        request_id: m.request_id,
        employee_id: m.employee_id,
        vehicle_id: m.vehicle_id,
        status,
        start_time: m.start_time,
        start_reading: m.start_reading,
        start_meter_photo: m.start_meter_photo,
        start_location_lat: m.start_location_lat,
        start_location_lng: m.start_location_lng,
        end_time: m.end_time,
        end_reading: m.end_reading,
        end_meter_photo: m.end_meter_photo,
        end_location_lat: m.end_location_lat,
        end_location_lng: m.end_location_lng,
        distance: m.distance,
        created_at: m.created_at,
    })
}

fn active_model(t: &Trip) -> trip::ActiveModel {
    trip::ActiveModel {
        id: Set(t.id.clone()),
        request_id: Set(t.request_id.clone()),
        employee_id: Set(t.employee_id.clone()),
        vehicle_id: Set(t.vehicle_id.clone()),
        status: Set(t.status.as_str().to_string()),
        start_time: Set(t.start_time),
        start_reading: Set(t.start_reading),
        start_meter_photo: Set(t.start_meter_photo.clone()),
        start_location_lat: Set(t.start_location_lat),
        start_location_lng: Set(t.start_location_lng),
        end_time: Set(t.end_time),
        end_reading: Set(t.end_reading),
        end_meter_photo: Set(t.end_meter_photo.clone()),
        end_location_lat: Set(t.end_location_lat),
        end_location_lng: Set(t.end_location_lng),
        distance: Set(t.distance),
        created_at: Set(t.created_at),
    }
}

// ── TripRepository impl ─────────────────────────────────────────

#[async_trait]
impl TripRepository for SeaOrmTripRepository {
    async fn save(&self, trip: Trip) -> DomainResult<()> {
        debug!("Saving trip {} for request {}", trip.id, trip.request_id);
        active_model(&trip).insert(&self.db).await.map_err(|e| {
            unique_err(e, || {
                format!("Trip for request {} already exists", trip.request_id)
            })
        })?;
        Ok(())
    }

    async fn find_by_request(&self, request_id: &str) -> DomainResult<Option<Trip>> {
        let model = trip::Entity::find()
            .filter(trip::Column::RequestId.eq(request_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_by_employee(&self, employee_id: &str) -> DomainResult<Vec<Trip>> {
        let models = trip::Entity::find()
            .filter(trip::Column::EmployeeId.eq(employee_id))
            .order_by_desc(trip::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_active(&self) -> DomainResult<Vec<Trip>> {
        let models = trip::Entity::find()
            .filter(trip::Column::Status.eq(TripStatus::Active.as_str()))
            .order_by_desc(trip::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn complete_and_release(&self, trip: &Trip) -> DomainResult<()> {
        debug!("Completing trip {} and releasing vehicle {}", trip.id, trip.vehicle_id);
        let txn = self.db.begin().await.map_err(db_err)?;

        let updated = trip::Entity::update_many()
            .set(active_model(trip))
            .filter(trip::Column::Id.eq(trip.id.as_str()))
            .filter(trip::Column::Status.eq(TripStatus::Active.as_str()))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if updated.rows_affected != 1 {
            txn.rollback().await.map_err(db_err)?;
            let stored = trip::Entity::find_by_id(trip.id.clone())
                .one(&self.db)
                .await
                .map_err(db_err)?;
            return Err(match stored {
                None => DomainError::not_found("Trip", &trip.id),
                Some(m) => {
                    DomainError::Conflict(format!("Trip {} is already {}", trip.id, m.status))
                }
            });
        }

        // The vehicle may have been removed meanwhile; the trip still completes.
        vehicle::Entity::update_many()
            .col_expr(
                vehicle::Column::Status,
                Expr::value(VehicleStatus::Available.as_str()),
            )
            .col_expr(vehicle::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(vehicle::Column::Id.eq(trip.vehicle_id.as_str()))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn find_report_records(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<TripReportRecord>> {
        let trips = trip::Entity::find()
            .filter(trip::Column::StartTime.gte(from))
            .filter(trip::Column::StartTime.lte(to))
            .order_by_desc(trip::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(model_to_domain)
            .collect::<DomainResult<Vec<Trip>>>()?;
        if trips.is_empty() {
            return Ok(Vec::new());
        }

        let vehicle_ids: Vec<&str> = trips.iter().map(|t| t.vehicle_id.as_str()).collect();
        let employee_ids: Vec<&str> = trips.iter().map(|t| t.employee_id.as_str()).collect();
        let request_ids: Vec<&str> = trips.iter().map(|t| t.request_id.as_str()).collect();

        let vehicles: HashMap<String, Vehicle> = vehicle::Entity::find()
            .filter(vehicle::Column::Id.is_in(vehicle_ids))
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|m| vehicle_to_domain(m).map(|v| (v.id.clone(), v)))
            .collect::<DomainResult<_>>()?;
        let profiles: HashMap<String, Profile> = profile::Entity::find()
            .filter(profile::Column::Id.is_in(employee_ids))
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|m| (m.id.clone(), profile_to_domain(m)))
            .collect();
        let requests: HashMap<String, TripRequest> = trip_request::Entity::find()
            .filter(trip_request::Column::Id.is_in(request_ids))
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|m| request_to_domain(m).map(|r| (r.id.clone(), r)))
            .collect::<DomainResult<_>>()?;

        Ok(trips
            .iter()
            .map(|t| {
                TripReportRecord::compose(
                    t,
                    vehicles.get(&t.vehicle_id),
                    profiles.get(&t.employee_id),
                    requests.get(&t.request_id),
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trip::{UNASSIGNED_VEHICLE, UNKNOWN_EMPLOYEE};
    use crate::domain::{ApprovalStatus, Checkpoint, GeoPoint, Identity, RepositoryProvider};
    use crate::infrastructure::database::repositories::{test_db, SeaOrmRepositoryProvider};

    fn checkpoint(reading: f64, at: DateTime<Utc>) -> Checkpoint {
        Checkpoint {
            reading,
            photo_url: "http://localhost/storage/meter-photos/p.jpg".into(),
            location: GeoPoint::new(12.97, 77.59).unwrap(),
            at,
        }
    }

    /// Employee profile, vehicle and an assigned request, ready to start.
    async fn assigned(repos: &SeaOrmRepositoryProvider) -> (TripRequest, Vehicle) {
        let identity = Identity::new(format!("{}@fleet.local", uuid::Uuid::new_v4()), "hash");
        let employee_id = identity.id.clone();
        let email = identity.email.clone();
        repos.users().create_identity(identity).await.unwrap();
        repos
            .users()
            .create_profile(Profile::new(&employee_id, "Asha Rao", email, None))
            .await
            .unwrap();

        let plate = format!("KA-{}", &uuid::Uuid::new_v4().to_string()[..8]);
        let v = Vehicle::new("Van", plate, None).unwrap();
        repos.vehicles().save(v.clone()).await.unwrap();

        let mut r = TripRequest::new(&employee_id, "Depot", "Delivery", Utc::now()).unwrap();
        repos.trip_requests().save(r.clone()).await.unwrap();
        r.approve("mgr-1", Utc::now()).unwrap();
        repos
            .trip_requests()
            .update_if_status(&r, ApprovalStatus::Pending)
            .await
            .unwrap();
        r.assign("mgr-1", &v.id).unwrap();
        repos.trip_requests().commit_assignment(&r).await.unwrap();
        (r, v)
    }

    #[tokio::test]
    async fn one_trip_per_request() {
        let repos = SeaOrmRepositoryProvider::new(test_db::connect().await);
        let (r, _) = assigned(&repos).await;
        let trip = Trip::start(&r, checkpoint(1000.0, Utc::now())).unwrap();
        repos.trips().save(trip).await.unwrap();

        let again = Trip::start(&r, checkpoint(1000.0, Utc::now())).unwrap();
        assert!(matches!(
            repos.trips().save(again).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn completion_releases_vehicle_once() {
        let repos = SeaOrmRepositoryProvider::new(test_db::connect().await);
        let (r, v) = assigned(&repos).await;
        let mut trip = Trip::start(&r, checkpoint(1000.0, Utc::now())).unwrap();
        repos.trips().save(trip.clone()).await.unwrap();
        assert_eq!(repos.trips().find_active().await.unwrap().len(), 1);

        trip.finish(checkpoint(1050.0, Utc::now())).unwrap();
        repos.trips().complete_and_release(&trip).await.unwrap();

        let stored = repos.trips().find_by_request(&r.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TripStatus::Completed);
        assert_eq!(stored.distance, Some(50.0));
        let v = repos.vehicles().find_by_id(&v.id).await.unwrap().unwrap();
        assert_eq!(v.status, VehicleStatus::Available);
        assert!(repos.trips().find_active().await.unwrap().is_empty());

        assert!(matches!(
            repos.trips().complete_and_release(&trip).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn report_records_join_and_survive_vehicle_removal() {
        let repos = SeaOrmRepositoryProvider::new(test_db::connect().await);
        let now = Utc::now();

        let (r1, v1) = assigned(&repos).await;
        let mut t1 = Trip::start(&r1, checkpoint(10.0, now - chrono::Duration::hours(2))).unwrap();
        repos.trips().save(t1.clone()).await.unwrap();
        t1.finish(checkpoint(35.5, now - chrono::Duration::hours(1)))
            .unwrap();
        repos.trips().complete_and_release(&t1).await.unwrap();
        repos.vehicles().delete(&v1.id).await.unwrap();

        let (r2, _) = assigned(&repos).await;
        let t2 = Trip::start(&r2, checkpoint(500.0, now)).unwrap();
        repos.trips().save(t2.clone()).await.unwrap();

        let records = repos
            .trips()
            .find_report_records(now - chrono::Duration::days(1), now + chrono::Duration::days(1))
            .await
            .unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].trip_id, t2.id);
        assert_eq!(records[0].vehicle_name, "Van");
        assert_eq!(records[0].employee_name, "Asha Rao");
        assert_eq!(records[0].purpose, "Delivery");
        assert_eq!(records[0].approval_status, ApprovalStatus::Assigned);

        assert_eq!(records[1].trip_id, t1.id);
        assert_eq!(records[1].vehicle_name, UNASSIGNED_VEHICLE);
        assert_ne!(records[1].employee_name, UNKNOWN_EMPLOYEE);
        assert_eq!(records[1].distance, Some(25.5));

        let outside = repos
            .trips()
            .find_report_records(now + chrono::Duration::days(1), now + chrono::Duration::days(2))
            .await
            .unwrap();
        assert!(outside.is_empty());
    }
}
