//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod memory;
pub mod storage;

pub use database::{init_database, SeaOrmRepositoryProvider};
pub use memory::InMemoryRepositoryProvider;
pub use storage::{InMemoryObjectStore, LocalObjectStore};
