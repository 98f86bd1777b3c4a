//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod repository_provider;
pub mod trip_repository;
pub mod trip_request_repository;
pub mod user_repository;
pub mod vehicle_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;
use crate::shared::errors::InfraError;

pub(crate) fn db_err(e: DbErr) -> DomainError {
    InfraError::Database(e).into()
}

/// Like [`db_err`], but a unique-constraint violation becomes `Conflict(msg)`.
pub(crate) fn unique_err(e: DbErr, msg: impl FnOnce() -> String) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::Conflict(msg()),
        _ => db_err(e),
    }
}

/// A stored status string the domain does not know.
pub(crate) fn corrupt(column: &str, value: &str) -> DomainError {
    DomainError::Storage(format!("Unknown {} '{}' in database", column, value))
}

#[cfg(test)]
pub(crate) mod test_db {
    use sea_orm::{ConnectOptions, Database, DatabaseConnection};
    use sea_orm_migration::MigratorTrait;

    use crate::infrastructure::database::migrator::Migrator;

    /// Fresh migrated in-memory SQLite database on a single connection.
    pub async fn connect() -> DatabaseConnection {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }
}
