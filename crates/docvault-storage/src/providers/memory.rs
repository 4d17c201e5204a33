//! In-memory blob store.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::{BlobObjectMeta, BlobStore};

use crate::paths::{PublicUrls, validate_path};

#[derive(Debug, Clone)]
struct StoredBlob {
    data: Bytes,
    content_type: String,
}

/// Blob store that keeps every payload in a [`DashMap`].
#[derive(Debug)]
pub struct MemoryBlobStore {
    blobs: DashMap<String, StoredBlob>,
    urls: PublicUrls,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new(urls: PublicUrls) -> Self {
        Self {
            blobs: DashMap::new(),
            urls,
        }
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Every stored path, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.blobs.iter().map(|e| e.key().clone()).collect();
        paths.sort();
        paths
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new(PublicUrls::new("memory://blobs", "pdf"))
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put(&self, path: &str, data: Bytes, content_type: &str) -> AppResult<String> {
        let key = validate_path(path)?.to_string();
        match self.blobs.entry(key.clone()) {
            Entry::Occupied(_) => Err(AppError::constraint(format!(
                "Blob already exists: {path}"
            ))),
            Entry::Vacant(slot) => {
                debug!(path = %key, bytes = data.len(), "Stored blob in memory");
                slot.insert(StoredBlob {
                    data,
                    content_type: content_type.to_string(),
                });
                Ok(key)
            }
        }
    }

    async fn get(&self, path: &str) -> AppResult<Bytes> {
        let key = validate_path(path)?;
        self.blobs
            .get(key)
            .map(|blob| blob.data.clone())
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {path}")))
    }

    async fn delete(&self, paths: &[String]) -> AppResult<()> {
        let mut first_error = None;
        for path in paths {
            let removed = validate_path(path).and_then(|key| {
                self.blobs
                    .remove(key)
                    .map(|_| ())
                    .ok_or_else(|| AppError::not_found(format!("Blob not found: {path}")))
            });
            if let Err(e) = removed {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.blobs.contains_key(validate_path(path)?))
    }

    async fn metadata(&self, path: &str) -> AppResult<BlobObjectMeta> {
        let key = validate_path(path)?;
        self.blobs
            .get(key)
            .map(|blob| BlobObjectMeta {
                path: key.to_string(),
                size_bytes: blob.data.len() as u64,
                content_type: Some(blob.content_type.clone()),
            })
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {path}")))
    }

    fn public_url(&self, path: &str) -> String {
        self.urls.url_for(path)
    }

    fn path_from_url(&self, url: &str) -> Option<String> {
        self.urls.path_for(url)
    }
}
