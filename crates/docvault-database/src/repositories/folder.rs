//! Folder repository implementation.

use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::FolderId;
use docvault_entity::folder::{Folder, FolderSummary};

use super::{FILE_FOLDER_FKEY, FOLDER_NAME_KEY, unavailable, violated_constraint};

/// Repository for the `folders` table.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT id, name, created_at FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unavailable("Failed to find folder", e))
    }

    /// Find a folder by name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT id, name, created_at FROM folders WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unavailable("Failed to find folder by name", e))
    }

    /// List every folder with its file count, newest first.
    pub async fn list_with_counts(&self) -> AppResult<Vec<FolderSummary>> {
        sqlx::query_as::<_, FolderSummary>(
            "SELECT fo.id, fo.name, fo.created_at, COUNT(fi.id) AS total_files \
             FROM folders fo LEFT JOIN files fi ON fi.folder_id = fo.id \
             GROUP BY fo.id, fo.name, fo.created_at \
             ORDER BY fo.created_at DESC, fo.id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| unavailable("Failed to list folders", e))
    }

    /// Create a new folder.
    pub async fn create(&self, name: &str) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match violated_constraint(&e).as_deref() {
            Some(FOLDER_NAME_KEY) => AppError::with_source(
                ErrorKind::ConstraintViolation,
                format!("Folder '{name}' already exists"),
                e,
            ),
            _ => unavailable("Failed to create folder", e),
        })
    }

    /// Delete a folder. The foreign key refuses folders that still hold files.
    pub async fn delete(&self, id: FolderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match violated_constraint(&e).as_deref() {
                Some(FILE_FOLDER_FKEY) => AppError::with_source(
                    ErrorKind::FolderNotEmpty,
                    format!("Folder {id} still contains files"),
                    e,
                ),
                _ => unavailable("Failed to delete folder", e),
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Count files in a folder.
    pub async fn count_files(&self, id: FolderId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files WHERE folder_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unavailable("Failed to count files", e))?;
        Ok(count.max(0) as u64)
    }

    /// Check connectivity.
    pub async fn ping(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| unavailable("Catalog health check failed", e))
    }
}
