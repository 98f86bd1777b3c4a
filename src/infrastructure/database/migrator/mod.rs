//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_identities;
mod m20250101_000002_create_profiles;
mod m20250101_000003_create_user_roles;
mod m20250101_000004_create_vehicles;
mod m20250101_000005_create_trip_requests;
mod m20250101_000006_create_trips;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_identities::Migration),
            Box::new(m20250101_000002_create_profiles::Migration),
            Box::new(m20250101_000003_create_user_roles::Migration),
            Box::new(m20250101_000004_create_vehicles::Migration),
            Box::new(m20250101_000005_create_trip_requests::Migration),
            Box::new(m20250101_000006_create_trips::Migration),
        ]
    }
}
