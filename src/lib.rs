//! # Fleet Trips
//!
//! Backend for company vehicle trips: employees request a vehicle, vehicle
//! managers approve and assign one, the employee records odometer readings
//! with meter photos and GPS at trip start and end, and admins provision
//! accounts and export weekly reports.
//!
//! ## Architecture
//!
//! - **domain**: aggregates (users, vehicles, trip requests, trips) and
//!   their repository traits
//! - **application**: use cases (trip lifecycle, vehicles, identity,
//!   reports) and the object store port
//! - **infrastructure**: SeaORM/SQLite persistence, in-memory adapters,
//!   object stores, JWT and bcrypt
//! - **interfaces**: axum REST API with Swagger documentation
//! - **shared**: error types and shutdown signalling

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiServices};
