//! Object store adapters

mod local;
mod memory;

pub use local::LocalObjectStore;
pub use memory::InMemoryObjectStore;

use crate::domain::{DomainError, DomainResult};

/// Normalise a relative object path, refusing anything that could escape
/// its bucket.
pub(crate) fn clean_object_path(path: &str) -> DomainResult<String> {
    if path.starts_with('/') || path.contains('\\') {
        return Err(DomainError::Validation(format!("Invalid object path: {}", path)));
    }
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() || segments.iter().any(|s| *s == "." || *s == "..") {
        return Err(DomainError::Validation(format!("Invalid object path: {}", path)));
    }
    Ok(segments.join("/"))
}

pub(crate) fn public_url(base_url: &str, bucket: &str, path: &str) -> String {
    format!("{}/storage/{}/{}", base_url, bucket, path)
}
