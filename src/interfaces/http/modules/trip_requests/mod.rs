//! Trip request lifecycle endpoints: submit, decide, assign, start, end

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
