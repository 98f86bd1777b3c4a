//! Public read access to stored meter photos

pub mod handlers;

pub use handlers::*;
