//! Single-file lookups and deletion.

use std::sync::Arc;

use tracing::{info, warn};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::BlobStore;
use docvault_core::types::FileId;
use docvault_database::Catalog;
use docvault_entity::file::File;

use crate::context::RequestContext;

/// Reads and deletes individual files.
#[derive(Debug, Clone)]
pub struct FileService {
    catalog: Arc<dyn Catalog>,
    blobs: Arc<dyn BlobStore>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(catalog: Arc<dyn Catalog>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { catalog, blobs }
    }

    /// Gets a file by ID.
    pub async fn get_file(&self, file_id: FileId) -> AppResult<File> {
        self.catalog
            .find_file(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))
    }

    /// Deletes a file.
    ///
    /// The catalog row goes first; once it is gone the file no longer exists
    /// as far as listings are concerned. A blob that cannot be removed
    /// afterwards is logged and left behind.
    pub async fn delete_file(&self, ctx: &RequestContext, file_id: FileId) -> AppResult<File> {
        let actor = ctx.require_actor()?;
        let file = self.get_file(file_id).await?;

        if !self.catalog.delete_file(file_id).await? {
            return Err(AppError::not_found(format!("File {file_id} not found")));
        }

        match self.blobs.path_from_url(&file.url) {
            Some(path) => {
                if let Err(e) = self.blobs.delete(std::slice::from_ref(&path)).await {
                    warn!(file_id = %file_id, path = %path, error = %e, "Orphaned blob left in store");
                }
            }
            None => warn!(file_id = %file_id, url = %file.url, "Blob URL not recognised, blob left in store"),
        }

        info!(user_id = %actor.user_id, file_id = %file_id, name = %file.name, "File deleted");
        Ok(file)
    }
}
