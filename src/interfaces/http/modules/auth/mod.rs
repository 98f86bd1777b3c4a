//! Authentication module: sign-in, sign-out, current account

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
