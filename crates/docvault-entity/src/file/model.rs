//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::{FileId, FolderId};

/// A file placed in a folder.
///
/// The blob itself lives in the blob store; `url` points at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Catalog-assigned identifier, preserved across moves.
    pub id: FileId,
    /// Display name, unique (case-insensitively) within its folder.
    pub name: String,
    /// Public URL of the blob.
    pub url: String,
    /// The owning folder.
    pub folder_id: FolderId,
    /// Human-readable size, e.g. `"120.5 KB"`.
    pub file_size: String,
    /// Who placed the file at its current location.
    pub uploaded_by_user_id: String,
    /// Display name of [`File::uploaded_by_user_id`].
    pub uploaded_by_user_name: String,
    /// When the file was placed at its current location.
    pub created_at: DateTime<Utc>,
}

/// Split `name` on its last `.` into `(base, ".ext")`.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) => name.split_at(idx),
        None => (name, ""),
    }
}

/// Data required to insert a new file row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFile {
    /// Display name.
    pub name: String,
    /// Public URL of the blob.
    pub url: String,
    /// Destination folder.
    pub folder_id: FolderId,
    /// Human-readable size.
    pub file_size: String,
    /// Acting user's ID.
    pub uploaded_by_user_id: String,
    /// Acting user's name.
    pub uploaded_by_user_name: String,
    /// Placement time.
    pub created_at: DateTime<Utc>,
}

/// The columns a move rewrites on an existing row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilePlacement {
    /// New owning folder.
    pub folder_id: FolderId,
    /// Display name in the new folder.
    pub name: String,
    /// URL of the blob at its new path.
    pub url: String,
    /// Acting user's ID.
    pub uploaded_by_user_id: String,
    /// Acting user's name.
    pub uploaded_by_user_name: String,
    /// Placement time.
    pub created_at: DateTime<Utc>,
}

impl FilePlacement {
    /// Apply this placement to `file`, keeping its identity and size.
    pub fn apply_to(&self, file: &File) -> File {
        File {
            id: file.id,
            name: self.name.clone(),
            url: self.url.clone(),
            folder_id: self.folder_id,
            file_size: file.file_size.clone(),
            uploaded_by_user_id: self.uploaded_by_user_id.clone(),
            uploaded_by_user_name: self.uploaded_by_user_name.clone(),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_extension_uses_last_dot() {
        assert_eq!(split_extension("a.b.c.txt"), ("a.b.c", ".txt"));
        assert_eq!(split_extension("notes"), ("notes", ""));
        assert_eq!(split_extension(".env"), ("", ".env"));
    }

    #[test]
    fn test_placement_preserves_identity() {
        let file = File {
            id: FileId(9),
            name: "report.pdf".into(),
            url: "http://blobs/pdf/A/report.pdf".into(),
            folder_id: FolderId(1),
            file_size: "1.0 KB".into(),
            uploaded_by_user_id: "u1".into(),
            uploaded_by_user_name: "Ann".into(),
            created_at: Utc::now(),
        };
        let placement = FilePlacement {
            folder_id: FolderId(2),
            name: "report(1).pdf".into(),
            url: "http://blobs/pdf/B/report-1.pdf".into(),
            uploaded_by_user_id: "u2".into(),
            uploaded_by_user_name: "Bo".into(),
            created_at: Utc::now(),
        };

        let moved = placement.apply_to(&file);
        assert_eq!(moved.id, file.id);
        assert_eq!(moved.file_size, file.file_size);
        assert_eq!(moved.folder_id, FolderId(2));
        assert_eq!(moved.uploaded_by_user_name, "Bo");
    }
}
