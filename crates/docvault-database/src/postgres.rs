//! PostgreSQL-backed catalog.

use async_trait::async_trait;
use sqlx::PgPool;

use docvault_core::result::AppResult;
use docvault_core::types::{FileId, FolderId};
use docvault_entity::file::{File, FilePlacement, NewFile};
use docvault_entity::folder::{Folder, FolderSummary};

use crate::catalog::Catalog;
use crate::repositories::{FileRepository, FolderRepository};

/// Catalog over the `folders` and `files` tables.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    folders: FolderRepository,
    files: FileRepository,
}

impl PgCatalog {
    /// Create a catalog over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            folders: FolderRepository::new(pool.clone()),
            files: FileRepository::new(pool),
        }
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    fn provider_type(&self) -> &str {
        "postgres"
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.folders.ping().await
    }

    async fn create_folder(&self, name: &str) -> AppResult<Folder> {
        self.folders.create(name).await
    }

    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        self.folders.find_by_id(id).await
    }

    async fn find_folder_by_name(&self, name: &str) -> AppResult<Option<Folder>> {
        self.folders.find_by_name(name).await
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<bool> {
        self.folders.delete(id).await
    }

    async fn count_files(&self, folder_id: FolderId) -> AppResult<u64> {
        self.folders.count_files(folder_id).await
    }

    async fn list_folders(&self) -> AppResult<Vec<FolderSummary>> {
        self.folders.list_with_counts().await
    }

    async fn find_file(&self, id: FileId) -> AppResult<Option<File>> {
        self.files.find_by_id(id).await
    }

    async fn list_files(&self, folder_id: FolderId) -> AppResult<Vec<File>> {
        self.files.find_by_folder(folder_id).await
    }

    async fn list_file_names(&self, folder_id: FolderId) -> AppResult<Vec<String>> {
        self.files.names_in_folder(folder_id).await
    }

    async fn insert_file(&self, data: &NewFile) -> AppResult<File> {
        self.files.create(data).await
    }

    async fn relocate_file(&self, id: FileId, placement: &FilePlacement) -> AppResult<File> {
        self.files.relocate(id, placement).await
    }

    async fn delete_file(&self, id: FileId) -> AppResult<bool> {
        self.files.delete(id).await
    }
}
