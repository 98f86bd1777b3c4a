//! Weekly trip reports and spreadsheet export (admins)

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
