//! User aggregate
//!
//! Identities, profiles, role labels and the repository interface.

pub mod model;
pub mod repository;

pub use model::{primary_role, Account, Actor, Identity, Profile, Role};
pub use repository::UserRepository;
