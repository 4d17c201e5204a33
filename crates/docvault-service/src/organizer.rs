//! Wiring of every organizer service over one catalog and one blob store.

use std::sync::Arc;

use docvault_core::config::AppConfig;
use docvault_core::result::AppResult;
use docvault_core::traits::BlobStore;
use docvault_database::{Catalog, build_catalog};
use docvault_storage::build_blob_store;

use crate::file::{FileService, UploadService};
use crate::folder::FolderService;
use crate::listing::ListingService;
use crate::transfer::{BulkController, TransferOrchestrator};

/// All organizer services, sharing the same stores.
#[derive(Debug, Clone)]
pub struct Organizer {
    /// Folder management.
    pub folders: FolderService,
    /// File lookup and deletion.
    pub files: FileService,
    /// Uploads.
    pub uploads: UploadService,
    /// Read-side listings.
    pub listing: ListingService,
    /// Single-file copy and move.
    pub transfers: TransferOrchestrator,
    /// Multi-file copy and move.
    pub bulk: BulkController,
}

impl Organizer {
    /// Build the services over existing stores.
    pub fn new(catalog: Arc<dyn Catalog>, blobs: Arc<dyn BlobStore>, config: &AppConfig) -> Self {
        let transfers =
            TransferOrchestrator::new(catalog.clone(), blobs.clone(), config.organizer.clone());
        Self {
            folders: FolderService::new(catalog.clone()),
            files: FileService::new(catalog.clone(), blobs.clone()),
            uploads: UploadService::new(
                catalog.clone(),
                blobs,
                &config.storage,
                config.organizer.clone(),
            ),
            listing: ListingService::new(catalog),
            bulk: BulkController::new(transfers.clone()),
            transfers,
        }
    }

    /// Open the configured stores and build the services over them.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let catalog = build_catalog(config).await?;
        let blobs = build_blob_store(&config.storage).await?;
        Ok(Self::new(catalog, blobs, config))
    }
}
