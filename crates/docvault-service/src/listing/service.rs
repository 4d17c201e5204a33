//! Read-side queries over folders and files.

use std::sync::Arc;

use tracing::debug;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::FolderId;
use docvault_database::Catalog;
use docvault_entity::file::File;
use docvault_entity::folder::{Folder, FolderSummary};

use crate::listing::query::FileQuery;
use crate::naming::NameSnapshot;

/// Lists folders and files straight from the catalog.
///
/// There is no pagination; every call is a full scan of the folder.
#[derive(Debug, Clone)]
pub struct ListingService {
    catalog: Arc<dyn Catalog>,
}

impl ListingService {
    /// Creates a new listing service.
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// All folders with their file counts, newest first.
    pub async fn list_folders(&self) -> AppResult<Vec<FolderSummary>> {
        self.catalog.list_folders().await
    }

    /// Files of a folder ordered by name.
    pub async fn list_files(&self, folder_id: FolderId) -> AppResult<Vec<File>> {
        self.require_folder(folder_id).await?;
        self.catalog.list_files(folder_id).await
    }

    /// Files of the folder with the given name.
    pub async fn list_files_in_folder_named(&self, name: &str) -> AppResult<Vec<File>> {
        let folder = self
            .catalog
            .find_folder_by_name(name.trim())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder '{}' not found", name.trim())))?;
        self.catalog.list_files(folder.id).await
    }

    /// Files of a folder projected through `query`.
    pub async fn query_files(&self, folder_id: FolderId, query: &FileQuery) -> AppResult<Vec<File>> {
        let files = self.list_files(folder_id).await?;
        Ok(query.apply(&files))
    }

    /// Snapshot of the names currently used in a folder.
    pub async fn existing_names(&self, folder_id: FolderId) -> AppResult<NameSnapshot> {
        let names = self.catalog.list_file_names(folder_id).await?;
        debug!(folder_id = %folder_id, count = names.len(), "Fetched existing names");
        Ok(NameSnapshot::from_names(names))
    }

    async fn require_folder(&self, folder_id: FolderId) -> AppResult<Folder> {
        self.catalog
            .find_folder(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }
}
