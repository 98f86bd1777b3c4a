pub mod fleet;
pub mod identity;
pub mod ports;
pub mod reports;

// Re-export key types for convenience
pub use fleet::{TripLifecycleService, VehicleService};
pub use identity::{IdentityService, TokenRevocations};
pub use ports::{ObjectStore, StoredObject};
pub use reports::ReportService;
