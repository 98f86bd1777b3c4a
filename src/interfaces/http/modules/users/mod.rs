//! Account provisioning and the admin account list

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
