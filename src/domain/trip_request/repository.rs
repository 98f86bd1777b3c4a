//! Trip request repository interface

use async_trait::async_trait;

use super::model::{ApprovalStatus, TripRequest};
use crate::domain::DomainResult;

#[async_trait]
pub trait TripRequestRepository: Send + Sync {
    async fn save(&self, request: TripRequest) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<TripRequest>>;
    /// Requests of one employee, newest first.
    async fn find_by_employee(&self, employee_id: &str) -> DomainResult<Vec<TripRequest>>;
    /// Requests in one status, oldest first.
    async fn find_by_status(&self, status: ApprovalStatus) -> DomainResult<Vec<TripRequest>>;

    /// Persist a decision only if the stored status still equals `expected`.
    ///
    /// Fails with `Conflict` when another writer moved the request first.
    async fn update_if_status(
        &self,
        request: &TripRequest,
        expected: ApprovalStatus,
    ) -> DomainResult<()>;

    /// Bind `request.vehicle_id` to an already-`assigned` request.
    ///
    /// Atomic: the vehicle flips `available -> in_use` and the request flips
    /// `approved -> assigned` together or not at all. Fails with `Conflict`
    /// when the vehicle is no longer available or the request is no longer
    /// approved.
    async fn commit_assignment(&self, request: &TripRequest) -> DomainResult<()>;
}
