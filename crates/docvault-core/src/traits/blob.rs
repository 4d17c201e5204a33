//! Blob store trait for pluggable byte storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Metadata about a stored blob.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BlobObjectMeta {
    /// Path within the blob store.
    pub path: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Content type recorded at write time (if known).
    pub content_type: Option<String>,
}

/// Trait for blob storage backends.
///
/// Paths are `/`-separated strings relative to the store's bucket. Writes
/// never overwrite: putting to an occupied path fails with
/// `ConstraintViolation`. Implementations live in `docvault-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store `data` at `path` and return the stored path.
    async fn put(&self, path: &str, data: Bytes, content_type: &str) -> AppResult<String>;

    /// Read the complete payload stored at `path`.
    async fn get(&self, path: &str) -> AppResult<Bytes>;

    /// Delete every path in `paths`.
    ///
    /// All paths are attempted; the first failure is returned after the
    /// remaining paths have been processed. A missing path is `NotFound`.
    async fn delete(&self, paths: &[String]) -> AppResult<()>;

    /// Check whether a blob exists at `path`.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Get metadata about the blob at `path`.
    async fn metadata(&self, path: &str) -> AppResult<BlobObjectMeta>;

    /// Public URL under which `path` is served. Pure, no I/O.
    fn public_url(&self, path: &str) -> String;

    /// Recover the blob path from a URL produced by [`BlobStore::public_url`].
    fn path_from_url(&self, url: &str) -> Option<String>;
}
