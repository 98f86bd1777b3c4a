//! Database entities module

pub mod identity;
pub mod profile;
pub mod trip;
pub mod trip_request;
pub mod user_role;
pub mod vehicle;

pub use identity::Entity as Identity;
pub use profile::Entity as Profile;
pub use trip::Entity as Trip;
pub use trip_request::Entity as TripRequest;
pub use user_role::Entity as UserRole;
pub use vehicle::Entity as Vehicle;
