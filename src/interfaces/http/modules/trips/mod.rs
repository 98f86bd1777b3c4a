//! Trip views shared by the request endpoints, plus the active-trip board

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
