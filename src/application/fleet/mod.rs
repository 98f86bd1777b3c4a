//! Fleet use cases: vehicles, trip requests and trips

pub mod lifecycle;
pub mod photo;
pub mod vehicles;

pub use lifecycle::{ActiveTrip, QueuedRequest, RequestDetails, TripEvidence, TripLifecycleService};
pub use photo::{MeterPhoto, PhotoStage, MAX_PHOTO_BYTES, METER_PHOTO_BUCKET};
pub use vehicles::VehicleService;
