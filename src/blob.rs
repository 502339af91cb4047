//! Blob store seam - "store bytes, get back a URL".
//!
//! Uploaded images (payment proofs, complaint photos, identity cards) go
//! through this trait. The contract is deliberately thin: a successful store
//! yields a stable URL the UI can later fetch; nothing more is promised.
//! Callers upload *before* opening their database transaction so a failed
//! upload can never leave an orphaned record behind.

use crate::errors::{Error, Result};
use std::future::Future;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

/// Storage for opaque binary content.
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` and returns a durable retrieval URL.
    fn store(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> impl Future<Output = Result<String>> + Send;
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "bin",
    }
}

/// Filesystem-backed blob store serving files from a local upload directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    base_url: String,
}

impl FsBlobStore {
    /// Creates a store writing under `root`, returning URLs under `base_url`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    /// Filesystem path a stored URL resolves to, if it belongs to this store.
    #[must_use]
    pub fn path_for(&self, url: &str) -> Option<PathBuf> {
        let name = url.strip_prefix(&self.base_url)?.strip_prefix('/')?;
        // Generated names never contain separators; reject anything else
        if name.contains('/') || name.contains("..") {
            return None;
        }
        Some(self.root.join(name))
    }
}

impl BlobStore for FsBlobStore {
    async fn store(&self, bytes: &[u8], content_type: &str) -> Result<String> {
        let name = format!(
            "{}.{}",
            Uuid::new_v4().simple(),
            extension_for(content_type)
        );

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Error::Dependency {
                service: "blob store",
                message: format!("failed to create upload directory: {e}"),
            })?;
        tokio::fs::write(self.root.join(&name), bytes)
            .await
            .map_err(|e| Error::Dependency {
                service: "blob store",
                message: format!("failed to write upload: {e}"),
            })?;

        debug!(name, size = bytes.len(), "stored blob");
        Ok(format!("{}/{name}", self.base_url))
    }
}

/// In-memory blob store for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: std::sync::Mutex<std::collections::HashMap<String, Vec<u8>>>,
}

#[cfg(test)]
impl MemoryBlobStore {
    /// Number of blobs stored so far.
    #[allow(clippy::unwrap_used)]
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[cfg(test)]
impl BlobStore for MemoryBlobStore {
    #[allow(clippy::unwrap_used)]
    async fn store(&self, bytes: &[u8], content_type: &str) -> Result<String> {
        let url = format!(
            "memory://{}.{}",
            Uuid::new_v4().simple(),
            extension_for(content_type)
        );
        self.objects
            .lock()
            .unwrap()
            .insert(url.clone(), bytes.to_vec());
        Ok(url)
    }
}

/// Blob store that always fails; used to test upload-failure rollback.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FailingBlobStore;

#[cfg(test)]
impl BlobStore for FailingBlobStore {
    async fn store(&self, _bytes: &[u8], _content_type: &str) -> Result<String> {
        Err(Error::Dependency {
            service: "blob store",
            message: "simulated outage".to_string(),
        })
    }
}
