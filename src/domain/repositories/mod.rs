//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::trip::TripRepository;
use super::trip_request::TripRequestRepository;
use super::user::UserRepository;
use super::vehicle::VehicleRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let request = repos.trip_requests().find_by_id("req-1").await?;
///     let trip = repos.trips().find_by_request("req-1").await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn vehicles(&self) -> &dyn VehicleRepository;
    fn trip_requests(&self) -> &dyn TripRequestRepository;
    fn trips(&self) -> &dyn TripRepository;
}
