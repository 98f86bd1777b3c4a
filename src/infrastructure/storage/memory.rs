//! In-memory object store for development and testing

use async_trait::async_trait;
use dashmap::DashMap;

use crate::application::ports::{ObjectStore, StoredObject};
use crate::domain::DomainResult;

pub struct InMemoryObjectStore {
    base_url: String,
    /// keyed by `bucket/path`
    objects: DashMap<String, StoredObject>,
}

impl InMemoryObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: DashMap::new(),
        }
    }

    fn key(bucket: &str, path: &str) -> String {
        format!("{}/{}", bucket, path)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> DomainResult<String> {
        let path = super::clean_object_path(path)?;
        self.objects.insert(
            Self::key(bucket, &path),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(path)
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        super::public_url(&self.base_url, bucket, path)
    }

    async fn get(&self, bucket: &str, path: &str) -> DomainResult<Option<StoredObject>> {
        let path = super::clean_object_path(path)?;
        Ok(self.objects.get(&Self::key(bucket, &path)).map(|o| o.clone()))
    }

    async fn delete(&self, bucket: &str, path: &str) -> DomainResult<()> {
        let path = super::clean_object_path(path)?;
        self.objects.remove(&Self::key(bucket, &path));
        Ok(())
    }
}
