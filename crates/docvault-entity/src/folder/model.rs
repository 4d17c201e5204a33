//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::FolderId;

/// A top-level folder. Folders do not nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Catalog-assigned identifier.
    pub id: FolderId,
    /// Folder name, unique across all folders. Used as the blob path prefix.
    pub name: String,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
}

/// A folder together with the number of files it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FolderSummary {
    /// Folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// Number of file rows referencing this folder.
    pub total_files: i64,
}

impl FolderSummary {
    /// Whether the folder may be deleted.
    pub fn is_empty(&self) -> bool {
        self.total_files == 0
    }
}
