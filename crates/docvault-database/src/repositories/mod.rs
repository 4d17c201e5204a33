//! PostgreSQL repositories for the catalog tables.

pub mod file;
pub mod folder;

pub use file::FileRepository;
pub use folder::FolderRepository;

use docvault_core::error::{AppError, ErrorKind};

/// Unique constraint on `folders.name`.
pub(crate) const FOLDER_NAME_KEY: &str = "folders_name_key";
/// Case-insensitive unique index on `files (folder_id, lower(name))`.
pub(crate) const FILE_NAME_KEY: &str = "files_folder_id_lower_name_key";
/// Foreign key from `files.folder_id` to `folders.id`.
pub(crate) const FILE_FOLDER_FKEY: &str = "files_folder_id_fkey";

/// Name of the constraint a database error violated, if any.
pub(crate) fn violated_constraint(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db_err) => db_err.constraint().map(str::to_owned),
        _ => None,
    }
}

/// Map a backend failure with no more specific meaning.
pub(crate) fn unavailable(message: &str, e: sqlx::Error) -> AppError {
    AppError::with_source(ErrorKind::StoreUnavailable, message, e)
}
