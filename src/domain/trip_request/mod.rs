//! Trip request aggregate

pub mod model;
pub mod repository;

pub use model::{ApprovalStatus, TripRequest};
pub use repository::TripRequestRepository;
