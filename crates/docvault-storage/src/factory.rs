//! Blob store construction from configuration.

use std::sync::Arc;

use tracing::info;

use docvault_core::config::StorageConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::BlobStore;

use crate::paths::PublicUrls;
use crate::providers::{LocalBlobStore, MemoryBlobStore};

/// Open the blob store selected by `storage.provider`.
pub async fn build_blob_store(config: &StorageConfig) -> AppResult<Arc<dyn BlobStore>> {
    let urls = PublicUrls::new(&config.public_base_url, &config.bucket);
    let store: Arc<dyn BlobStore> = match config.provider.as_str() {
        "local" => Arc::new(LocalBlobStore::new(&config.local.root_path, urls).await?),
        "memory" => Arc::new(MemoryBlobStore::new(urls)),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown storage provider '{other}'"
            )));
        }
    };
    info!(
        provider = store.provider_type(),
        bucket = %config.bucket,
        "Blob store ready"
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use docvault_core::error::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn test_local_provider_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StorageConfig::default();
        config.local.root_path = dir.path().join("blobs").display().to_string();

        let store = build_blob_store(&config).await.unwrap();
        assert_eq!(store.provider_type(), "local");
        assert!(store.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_provider() {
        let config = StorageConfig {
            provider: "s3".to_string(),
            ..StorageConfig::default()
        };
        let err = build_blob_store(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
