//! Outbound ports: interfaces the application drives
//!
//! [`ObjectStore`] is the contract for binary evidence such as meter photos.
//! Implementations live in `infrastructure::storage`.

use async_trait::async_trait;

use crate::domain::DomainResult;

/// Object read back from a store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Port for storing uploaded objects under `bucket/path` keys.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store (or overwrite) an object and return its path within the bucket.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> DomainResult<String>;

    /// Publicly reachable URL of a stored object.
    fn public_url(&self, bucket: &str, path: &str) -> String;

    async fn get(&self, bucket: &str, path: &str) -> DomainResult<Option<StoredObject>>;

    /// Deleting a missing object is not an error.
    async fn delete(&self, bucket: &str, path: &str) -> DomainResult<()>;
}
