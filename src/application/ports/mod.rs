//! Application ports (hexagonal architecture boundaries)
//!
//! Repository ports are defined per aggregate in `domain`.
//! Outbound ports that depend on application-layer types live here.

pub mod outbound;

pub use outbound::{ObjectStore, StoredObject};
