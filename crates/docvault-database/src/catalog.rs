//! The catalog store abstraction.
//!
//! The catalog holds one row per folder and one row per file. Every call
//! succeeds or fails on its own; there are no transactions spanning calls.
//! Failures are reported with these kinds:
//!
//! - `ConstraintViolation`: a duplicate folder name, or a file name already
//!   present (case-insensitively) in the destination folder.
//! - `TargetFolderNotFound`: a file row referenced a folder that does not exist.
//! - `FolderNotEmpty`: a folder delete was refused because files remain.
//! - `NotFound`: the row to update does not exist.
//! - `StoreUnavailable`: anything else the backend reports.

use std::fmt::Debug;

use async_trait::async_trait;

use docvault_core::result::AppResult;
use docvault_core::types::{FileId, FolderId};
use docvault_entity::file::{File, FilePlacement, NewFile};
use docvault_entity::folder::{Folder, FolderSummary};

/// Folder and file metadata storage.
#[async_trait]
pub trait Catalog: Send + Sync + Debug + 'static {
    /// Backend name (`postgres`, `memory`).
    fn provider_type(&self) -> &str;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Insert a folder. A duplicate name is a `ConstraintViolation`.
    async fn create_folder(&self, name: &str) -> AppResult<Folder>;

    /// Find a folder by ID.
    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Find a folder by exact name.
    async fn find_folder_by_name(&self, name: &str) -> AppResult<Option<Folder>>;

    /// Delete a folder. Returns `false` when it did not exist.
    async fn delete_folder(&self, id: FolderId) -> AppResult<bool>;

    /// Number of files in a folder.
    async fn count_files(&self, folder_id: FolderId) -> AppResult<u64>;

    /// All folders with their file counts, newest first.
    async fn list_folders(&self) -> AppResult<Vec<FolderSummary>>;

    /// Find a file by ID.
    async fn find_file(&self, id: FileId) -> AppResult<Option<File>>;

    /// Files of one folder ordered by lowercased name in code-point order,
    /// then exact name, then ID. Every backend lists in this order.
    async fn list_files(&self, folder_id: FolderId) -> AppResult<Vec<File>>;

    /// Display names of the files in one folder.
    async fn list_file_names(&self, folder_id: FolderId) -> AppResult<Vec<String>>;

    /// Insert a new file row.
    async fn insert_file(&self, data: &NewFile) -> AppResult<File>;

    /// Rewrite the placement of an existing row, preserving its ID.
    async fn relocate_file(&self, id: FileId, placement: &FilePlacement) -> AppResult<File>;

    /// Delete a file row. Returns `false` when it did not exist.
    async fn delete_file(&self, id: FileId) -> AppResult<bool>;
}
