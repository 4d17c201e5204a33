//! File repository implementation.

use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::{FileId, FolderId};
use docvault_entity::file::{File, FilePlacement, NewFile};

use super::{FILE_FOLDER_FKEY, FILE_NAME_KEY, unavailable, violated_constraint};

const FILE_COLUMNS: &str = "id, name, url, folder_id, file_size, \
     uploaded_by_user_id, uploaded_by_user_name, created_at";

/// Repository for the `files` table.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(&format!("SELECT {FILE_COLUMNS} FROM files WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unavailable("Failed to find file", e))
    }

    /// List the files of a folder ordered by name, ignoring case.
    pub async fn find_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE folder_id = $1 \
             ORDER BY lower(name) COLLATE \"C\", name COLLATE \"C\", id"
        ))
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| unavailable("Failed to list files", e))
    }

    /// List the display names present in a folder.
    pub async fn names_in_folder(&self, folder_id: FolderId) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>("SELECT name FROM files WHERE folder_id = $1")
            .bind(folder_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| unavailable("Failed to list file names", e))
    }

    /// Create a new file record.
    pub async fn create(&self, data: &NewFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(&format!(
            "INSERT INTO files (name, url, folder_id, file_size, uploaded_by_user_id, \
             uploaded_by_user_name, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {FILE_COLUMNS}"
        ))
        .bind(&data.name)
        .bind(&data.url)
        .bind(data.folder_id)
        .bind(&data.file_size)
        .bind(&data.uploaded_by_user_id)
        .bind(&data.uploaded_by_user_name)
        .bind(data.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &data.name, data.folder_id, "Failed to create file"))
    }

    /// Move a row to a new placement, keeping its ID.
    pub async fn relocate(&self, id: FileId, placement: &FilePlacement) -> AppResult<File> {
        sqlx::query_as::<_, File>(&format!(
            "UPDATE files SET folder_id = $2, name = $3, url = $4, uploaded_by_user_id = $5, \
             uploaded_by_user_name = $6, created_at = $7 \
             WHERE id = $1 RETURNING {FILE_COLUMNS}"
        ))
        .bind(id)
        .bind(placement.folder_id)
        .bind(&placement.name)
        .bind(&placement.url)
        .bind(&placement.uploaded_by_user_id)
        .bind(&placement.uploaded_by_user_name)
        .bind(placement.created_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            write_error(e, &placement.name, placement.folder_id, "Failed to relocate file")
        })?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    /// Delete a file record.
    pub async fn delete(&self, id: FileId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| unavailable("Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }
}

fn write_error(e: sqlx::Error, name: &str, folder_id: FolderId, message: &str) -> AppError {
    match violated_constraint(&e).as_deref() {
        Some(FILE_NAME_KEY) => AppError::with_source(
            ErrorKind::ConstraintViolation,
            format!("File '{name}' already exists in folder {folder_id}"),
            e,
        ),
        Some(FILE_FOLDER_FKEY) => AppError::with_source(
            ErrorKind::TargetFolderNotFound,
            format!("Folder {folder_id} not found"),
            e,
        ),
        _ => unavailable(message, e),
    }
}
