//! Local filesystem blob store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::traits::{BlobObjectMeta, BlobStore};

use crate::paths::{PublicUrls, validate_path};

/// Blob store rooted at a directory on the local filesystem.
///
/// Blobs are plain files; the path inside the bucket maps directly onto the
/// directory tree under `root`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    urls: PublicUrls,
}

impl LocalBlobStore {
    /// Create a store rooted at `root_path`, creating the directory if needed.
    pub async fn new(root_path: &str, urls: PublicUrls) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root, urls })
    }

    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        Ok(self.root.join(validate_path(path)?))
    }

    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::StoreUnavailable,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

fn io_error(e: std::io::Error, action: &str, path: &str) -> AppError {
    let kind = match e.kind() {
        std::io::ErrorKind::NotFound => ErrorKind::NotFound,
        std::io::ErrorKind::AlreadyExists => ErrorKind::ConstraintViolation,
        _ => ErrorKind::StoreUnavailable,
    };
    AppError::with_source(kind, format!("Failed to {action} blob: {path}"), e)
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn put(&self, path: &str, data: Bytes, content_type: &str) -> AppResult<String> {
        let full_path = self.resolve(path)?;
        self.ensure_parent(&full_path).await?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)
            .await
            .map_err(|e| io_error(e, "create", path))?;

        if let Err(e) = file.write_all(&data).await {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&full_path).await {
                warn!(path, error = %cleanup, "Failed to remove partially written blob");
            }
            return Err(io_error(e, "write", path));
        }
        file.flush().await.map_err(|e| io_error(e, "flush", path))?;

        debug!(path, bytes = data.len(), content_type, "Wrote blob");
        Ok(validate_path(path)?.to_string())
    }

    async fn get(&self, path: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(path)?;
        let data = fs::read(&full_path)
            .await
            .map_err(|e| io_error(e, "read", path))?;
        Ok(Bytes::from(data))
    }

    async fn delete(&self, paths: &[String]) -> AppResult<()> {
        let mut first_error = None;
        for path in paths {
            let result = match self.resolve(path) {
                Ok(full_path) => fs::remove_file(&full_path)
                    .await
                    .map_err(|e| io_error(e, "delete", path)),
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => debug!(path = %path, "Deleted blob"),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        fs::try_exists(&full_path)
            .await
            .map_err(|e| io_error(e, "stat", path))
    }

    async fn metadata(&self, path: &str) -> AppResult<BlobObjectMeta> {
        let full_path = self.resolve(path)?;
        let meta = fs::metadata(&full_path)
            .await
            .map_err(|e| io_error(e, "stat", path))?;
        if !meta.is_file() {
            return Err(AppError::not_found(format!("Blob not found: {path}")));
        }
        Ok(BlobObjectMeta {
            path: path.to_string(),
            size_bytes: meta.len(),
            content_type: mime_guess::from_path(path)
                .first()
                .map(|m| m.essence_str().to_string()),
        })
    }

    fn public_url(&self, path: &str) -> String {
        self.urls.url_for(path)
    }

    fn path_from_url(&self, url: &str) -> Option<String> {
        self.urls.path_for(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store(dir: &tempfile::TempDir) -> LocalBlobStore {
        LocalBlobStore::new(
            dir.path().to_str().expect("utf-8 temp path"),
            PublicUrls::new("http://localhost/public", "pdf"),
        )
        .await
        .expect("store")
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;

        let data = Bytes::from("hello world");
        let path = store
            .put("Reports/hello.txt", data.clone(), "text/plain")
            .await
            .unwrap();
        assert_eq!(path, "Reports/hello.txt");
        assert!(store.exists("Reports/hello.txt").await.unwrap());
        assert_eq!(store.get("Reports/hello.txt").await.unwrap(), data);

        let meta = store.metadata("Reports/hello.txt").await.unwrap();
        assert_eq!(meta.size_bytes, 11);
        assert_eq!(meta.content_type.as_deref(), Some("text/plain"));

        store.delete(&[path]).await.unwrap();
        assert!(!store.exists("Reports/hello.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_put_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;

        store
            .put("A/x.pdf", Bytes::from("first"), "application/pdf")
            .await
            .unwrap();
        let err = store
            .put("A/x.pdf", Bytes::from("second"), "application/pdf")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConstraintViolation);
        assert_eq!(store.get("A/x.pdf").await.unwrap(), Bytes::from("first"));
    }

    #[tokio::test]
    async fn test_delete_attempts_every_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        store.put("A/a.txt", Bytes::from("a"), "text/plain").await.unwrap();
        store.put("A/b.txt", Bytes::from("b"), "text/plain").await.unwrap();

        let err = store
            .delete(&["A/a.txt".into(), "A/missing.txt".into(), "A/b.txt".into()])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(!store.exists("A/a.txt").await.unwrap());
        assert!(!store.exists("A/b.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        let err = store.get("A/nothing.pdf").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        let err = store
            .put("../outside.txt", Bytes::from("x"), "text/plain")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_url_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir).await;
        let url = store.public_url("My Folder/a b.pdf");
        assert_eq!(store.path_from_url(&url).as_deref(), Some("My Folder/a b.pdf"));
    }
}
