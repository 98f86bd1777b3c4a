//! Vehicle aggregate

pub mod model;
pub mod repository;

pub use model::{Vehicle, VehicleChanges, VehicleStatus};
pub use repository::VehicleRepository;
