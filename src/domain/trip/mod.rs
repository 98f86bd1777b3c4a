//! Trip aggregate
//!
//! Contains the Trip entity, checkpoint evidence, the reporting read model
//! and the repository interface.

pub mod model;
pub mod repository;

pub use model::{
    validate_reading, Checkpoint, GeoPoint, Trip, TripReportRecord, TripStatus,
    UNASSIGNED_VEHICLE, UNKNOWN_EMPLOYEE,
};
pub use repository::TripRepository;
