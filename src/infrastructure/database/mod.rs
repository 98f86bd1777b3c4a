//! SQLite persistence through SeaORM

pub mod entities;
pub mod migrator;
pub mod repositories;

pub use repositories::SeaOrmRepositoryProvider;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use migrator::Migrator;

/// Connect to the database and bring the schema up to date.
pub async fn init_database(url: &str) -> Result<DatabaseConnection, DbErr> {
    info!("Connecting to database: {}", url);
    let mut opts = ConnectOptions::new(url.to_string());
    opts.sqlx_logging(false);
    let db = Database::connect(opts).await?;
    info!("Database connected successfully");

    Migrator::up(&db, None).await?;
    info!("Database migrations applied");
    Ok(db)
}
