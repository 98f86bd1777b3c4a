//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping, validated JSON
//! - `middleware`: bearer authentication against the identity service
//! - `modules`: DTOs and handlers per resource
//! - `router`: service wiring, routes and Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiServices};

#[cfg(test)]
mod tests;
