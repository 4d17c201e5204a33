//! In-process catalog.
//!
//! Enforces the same constraints as the PostgreSQL schema: unique folder
//! names, case-insensitively unique file names per folder, file rows must
//! reference an existing folder, and folders holding files cannot be deleted.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{FileId, FolderId};
use docvault_entity::file::{File, FilePlacement, NewFile};
use docvault_entity::folder::{Folder, FolderSummary};

use crate::catalog::Catalog;

#[derive(Debug, Default)]
struct State {
    folders: BTreeMap<FolderId, Folder>,
    files: BTreeMap<FileId, File>,
    next_folder_id: i64,
    next_file_id: i64,
}

impl State {
    fn name_taken(&self, folder_id: FolderId, name: &str, except: Option<FileId>) -> bool {
        let lower = name.to_lowercase();
        self.files.values().any(|f| {
            f.folder_id == folder_id && Some(f.id) != except && f.name.to_lowercase() == lower
        })
    }

    fn check_placement(
        &self,
        folder_id: FolderId,
        name: &str,
        except: Option<FileId>,
    ) -> AppResult<()> {
        if !self.folders.contains_key(&folder_id) {
            return Err(AppError::target_folder_not_found(format!(
                "Folder {folder_id} not found"
            )));
        }
        if self.name_taken(folder_id, name, except) {
            return Err(AppError::constraint(format!(
                "File '{name}' already exists in folder {folder_id}"
            )));
        }
        Ok(())
    }
}

/// Catalog held entirely in memory behind a [`RwLock`].
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    state: RwLock<State>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn create_folder(&self, name: &str) -> AppResult<Folder> {
        let mut state = self.state.write().await;
        if state.folders.values().any(|f| f.name == name) {
            return Err(AppError::constraint(format!(
                "Folder '{name}' already exists"
            )));
        }
        state.next_folder_id += 1;
        let folder = Folder {
            id: FolderId(state.next_folder_id),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        state.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.state.read().await.folders.get(&id).cloned())
    }

    async fn find_folder_by_name(&self, name: &str) -> AppResult<Option<Folder>> {
        let state = self.state.read().await;
        Ok(state.folders.values().find(|f| f.name == name).cloned())
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.files.values().any(|f| f.folder_id == id) {
            return Err(AppError::folder_not_empty(format!(
                "Folder {id} still contains files"
            )));
        }
        Ok(state.folders.remove(&id).is_some())
    }

    async fn count_files(&self, folder_id: FolderId) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .files
            .values()
            .filter(|f| f.folder_id == folder_id)
            .count() as u64)
    }

    async fn list_folders(&self) -> AppResult<Vec<FolderSummary>> {
        let state = self.state.read().await;
        let mut summaries: Vec<FolderSummary> = state
            .folders
            .values()
            .map(|folder| FolderSummary {
                id: folder.id,
                name: folder.name.clone(),
                created_at: folder.created_at,
                total_files: state
                    .files
                    .values()
                    .filter(|f| f.folder_id == folder.id)
                    .count() as i64,
            })
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(summaries)
    }

    async fn find_file(&self, id: FileId) -> AppResult<Option<File>> {
        Ok(self.state.read().await.files.get(&id).cloned())
    }

    async fn list_files(&self, folder_id: FolderId) -> AppResult<Vec<File>> {
        let state = self.state.read().await;
        let mut files: Vec<File> = state
            .files
            .values()
            .filter(|f| f.folder_id == folder_id)
            .cloned()
            .collect();
        files.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
                .then(a.id.cmp(&b.id))
        });
        Ok(files)
    }

    async fn list_file_names(&self, folder_id: FolderId) -> AppResult<Vec<String>> {
        let state = self.state.read().await;
        Ok(state
            .files
            .values()
            .filter(|f| f.folder_id == folder_id)
            .map(|f| f.name.clone())
            .collect())
    }

    async fn insert_file(&self, data: &NewFile) -> AppResult<File> {
        let mut state = self.state.write().await;
        state.check_placement(data.folder_id, &data.name, None)?;
        state.next_file_id += 1;
        let file = File {
            id: FileId(state.next_file_id),
            name: data.name.clone(),
            url: data.url.clone(),
            folder_id: data.folder_id,
            file_size: data.file_size.clone(),
            uploaded_by_user_id: data.uploaded_by_user_id.clone(),
            uploaded_by_user_name: data.uploaded_by_user_name.clone(),
            created_at: data.created_at,
        };
        state.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn relocate_file(&self, id: FileId, placement: &FilePlacement) -> AppResult<File> {
        let mut state = self.state.write().await;
        let current = state
            .files
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        state.check_placement(placement.folder_id, &placement.name, Some(id))?;
        let moved = placement.apply_to(&current);
        state.files.insert(id, moved.clone());
        Ok(moved)
    }

    async fn delete_file(&self, id: FileId) -> AppResult<bool> {
        Ok(self.state.write().await.files.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use docvault_core::error::ErrorKind;

    use super::*;

    fn new_file(folder_id: FolderId, name: &str) -> NewFile {
        NewFile {
            name: name.to_string(),
            url: format!("http://blobs/pdf/{name}"),
            folder_id,
            file_size: "1.0 KB".to_string(),
            uploaded_by_user_id: "u1".to_string(),
            uploaded_by_user_name: "Ann".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_folder_name_rejected() {
        let catalog = MemoryCatalog::new();
        catalog.create_folder("Invoices").await.expect("create");
        let err = catalog.create_folder("Invoices").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConstraintViolation);
    }

    #[tokio::test]
    async fn test_list_files_orders_ignoring_case() {
        let catalog = MemoryCatalog::new();
        let folder = catalog.create_folder("A").await.expect("create");
        for name in ["beta.pdf", "Zeta.pdf", "Alpha.pdf", "alpha(1).pdf"] {
            catalog
                .insert_file(&new_file(folder.id, name))
                .await
                .expect("insert");
        }
        let names: Vec<String> = catalog
            .list_files(folder.id)
            .await
            .expect("list")
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["alpha(1).pdf", "Alpha.pdf", "beta.pdf", "Zeta.pdf"]);
    }

    #[tokio::test]
    async fn test_file_names_unique_case_insensitively() {
        let catalog = MemoryCatalog::new();
        let folder = catalog.create_folder("A").await.expect("create");
        catalog
            .insert_file(&new_file(folder.id, "Report.pdf"))
            .await
            .expect("insert");
        let err = catalog
            .insert_file(&new_file(folder.id, "report.PDF"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConstraintViolation);
    }

    #[tokio::test]
    async fn test_insert_into_missing_folder() {
        let catalog = MemoryCatalog::new();
        let err = catalog
            .insert_file(&new_file(FolderId(99), "x.pdf"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TargetFolderNotFound);
    }

    #[tokio::test]
    async fn test_relocate_keeps_id_and_allows_same_name() {
        let catalog = MemoryCatalog::new();
        let a = catalog.create_folder("A").await.expect("create");
        let b = catalog.create_folder("B").await.expect("create");
        let file = catalog
            .insert_file(&new_file(a.id, "x.pdf"))
            .await
            .expect("insert");

        let placement = FilePlacement {
            folder_id: b.id,
            name: "x.pdf".to_string(),
            url: "http://blobs/pdf/B/x-1.pdf".to_string(),
            uploaded_by_user_id: "u2".to_string(),
            uploaded_by_user_name: "Bo".to_string(),
            created_at: Utc::now(),
        };
        let moved = catalog.relocate_file(file.id, &placement).await.expect("relocate");
        assert_eq!(moved.id, file.id);
        assert_eq!(moved.folder_id, b.id);
        assert_eq!(catalog.count_files(a.id).await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_folder_delete_refused_while_files_remain() {
        let catalog = MemoryCatalog::new();
        let folder = catalog.create_folder("A").await.expect("create");
        let file = catalog
            .insert_file(&new_file(folder.id, "x.pdf"))
            .await
            .expect("insert");

        let err = catalog.delete_folder(folder.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::FolderNotEmpty);

        assert!(catalog.delete_file(file.id).await.expect("delete file"));
        assert!(catalog.delete_folder(folder.id).await.expect("delete folder"));
    }

    #[tokio::test]
    async fn test_list_folders_counts_and_orders_newest_first() {
        let catalog = MemoryCatalog::new();
        let older = catalog.create_folder("Older").await.expect("create");
        let newer = catalog.create_folder("Newer").await.expect("create");
        catalog
            .insert_file(&new_file(older.id, "x.pdf"))
            .await
            .expect("insert");

        let folders = catalog.list_folders().await.expect("list");
        assert_eq!(folders[0].id, newer.id);
        assert_eq!(folders[1].total_files, 1);
        assert!(folders[0].is_empty());
    }
}
