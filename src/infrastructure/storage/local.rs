//! Filesystem object store
//!
//! Objects live at `<root>/<bucket>/<path>`; the content type is derived
//! from the file extension when read back.

use std::path::PathBuf;

use async_trait::async_trait;
use log::debug;

use crate::application::ports::{ObjectStore, StoredObject};
use crate::domain::{DomainError, DomainResult};
use crate::shared::errors::InfraError;

pub struct LocalObjectStore {
    root: PathBuf,
    base_url: String,
}

fn io_err(e: std::io::Error) -> DomainError {
    InfraError::Io(e).into()
}

fn content_type_for(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn resolve(&self, bucket: &str, path: &str) -> DomainResult<(String, PathBuf)> {
        let bucket = super::clean_object_path(bucket)?;
        let path = super::clean_object_path(path)?;
        let full = self.root.join(&bucket).join(&path);
        Ok((path, full))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> DomainResult<String> {
        let (path, full) = self.resolve(bucket, path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(&full, &bytes).await.map_err(io_err)?;
        debug!(
            "Stored object {}/{} ({} bytes, {})",
            bucket,
            path,
            bytes.len(),
            content_type
        );
        Ok(path)
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        super::public_url(&self.base_url, bucket, path)
    }

    async fn get(&self, bucket: &str, path: &str) -> DomainResult<Option<StoredObject>> {
        let (path, full) = self.resolve(bucket, path)?;
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(Some(StoredObject {
                bytes,
                content_type: content_type_for(&path).to_string(),
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(e)),
        }
    }

    async fn delete(&self, bucket: &str, path: &str) -> DomainResult<()> {
        let (path, full) = self.resolve(bucket, path)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => {
                debug!("Deleted object {}/{}", bucket, path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(e)),
        }
    }
}
