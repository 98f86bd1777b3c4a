//! Identity module: accounts and authentication
//!
//! Contains the `IdentityService` which orchestrates sign-in, sign-out,
//! account provisioning and the bootstrap administrator.

pub mod revocation;
pub mod service;

pub use revocation::TokenRevocations;
pub use service::{AuthResult, IdentityService, NewAccount};
