//! Trip repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Trip, TripReportRecord};
use crate::domain::DomainResult;

#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Fails with `Conflict` when the request already has a trip.
    async fn save(&self, trip: Trip) -> DomainResult<()>;
    async fn find_by_request(&self, request_id: &str) -> DomainResult<Option<Trip>>;
    async fn find_by_employee(&self, employee_id: &str) -> DomainResult<Vec<Trip>>;
    /// Active trips, most recently started first.
    async fn find_active(&self) -> DomainResult<Vec<Trip>>;

    /// Store the completed trip and return its vehicle to `available`.
    ///
    /// Both writes happen in one store transaction; the trip write only
    /// applies while the stored trip is still `active`.
    async fn complete_and_release(&self, trip: &Trip) -> DomainResult<()>;

    /// Trips started within `[from, to]`, joined for reporting, newest first.
    async fn find_report_records(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<TripReportRecord>>;
}
