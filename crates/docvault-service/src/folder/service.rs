//! Folder creation, import and deletion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::FolderId;
use docvault_database::Catalog;
use docvault_entity::folder::Folder;

use crate::context::RequestContext;

const MAX_FOLDER_NAME_LEN: usize = 255;

/// Manages the flat set of folders.
#[derive(Debug, Clone)]
pub struct FolderService {
    catalog: Arc<dyn Catalog>,
}

/// Result of importing a list of folder names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderImport {
    /// Every folder named in the import, in input order.
    pub folders: Vec<Folder>,
    /// How many of them did not exist before.
    pub created: usize,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, folder_id: FolderId) -> AppResult<Folder> {
        self.catalog
            .find_folder(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Gets a folder by its exact name.
    pub async fn get_folder_by_name(&self, name: &str) -> AppResult<Folder> {
        let name = name.trim();
        self.catalog
            .find_folder_by_name(name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder '{name}' not found")))
    }

    /// Creates a new folder. A name already in use is a `ConstraintViolation`.
    pub async fn create_folder(&self, ctx: &RequestContext, name: &str) -> AppResult<Folder> {
        let actor = ctx.require_actor()?;
        let name = validate_folder_name(name)?;
        let folder = self.catalog.create_folder(name).await?;
        info!(user_id = %actor.user_id, folder_id = %folder.id, name = %folder.name, "Folder created");
        Ok(folder)
    }

    /// Returns the folder called `name`, creating it if needed.
    ///
    /// The second element is `true` when the folder was created.
    pub async fn ensure_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> AppResult<(Folder, bool)> {
        let actor = ctx.require_actor()?;
        let name = validate_folder_name(name)?;
        if let Some(folder) = self.catalog.find_folder_by_name(name).await? {
            return Ok((folder, false));
        }
        match self.catalog.create_folder(name).await {
            Ok(folder) => {
                info!(user_id = %actor.user_id, folder_id = %folder.id, name = %folder.name, "Folder created");
                Ok((folder, true))
            }
            // Lost a race with another creator; the folder exists now.
            Err(e) if e.kind == ErrorKind::ConstraintViolation => {
                let folder = self
                    .catalog
                    .find_folder_by_name(name)
                    .await?
                    .ok_or(e)?;
                Ok((folder, false))
            }
            Err(e) => Err(e),
        }
    }

    /// Ensure every name in `names` exists as a folder.
    ///
    /// Names are trimmed and de-duplicated. Validation of all names happens
    /// before any folder is created.
    pub async fn import_folders(
        &self,
        ctx: &RequestContext,
        names: &[String],
    ) -> AppResult<FolderImport> {
        ctx.require_actor()?;
        let mut unique: Vec<&str> = Vec::new();
        for name in names {
            let name = validate_folder_name(name)?;
            if !unique.contains(&name) {
                unique.push(name);
            }
        }

        let mut folders = Vec::with_capacity(unique.len());
        let mut created = 0;
        for name in unique {
            let (folder, was_created) = self.ensure_folder(ctx, name).await?;
            if was_created {
                created += 1;
            }
            folders.push(folder);
        }
        info!(total = folders.len(), created, "Folders imported");
        Ok(FolderImport { folders, created })
    }

    /// Deletes an empty folder.
    pub async fn delete_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<()> {
        let actor = ctx.require_actor()?;
        let folder = self.get_folder(folder_id).await?;

        let files = self.catalog.count_files(folder_id).await?;
        if files > 0 {
            return Err(AppError::folder_not_empty(format!(
                "Folder '{}' still contains {files} file(s)",
                folder.name
            )));
        }

        if !self.catalog.delete_folder(folder_id).await? {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }
        info!(user_id = %actor.user_id, folder_id = %folder_id, name = %folder.name, "Folder deleted");
        Ok(())
    }
}

/// Trim and check a folder name.
///
/// Folder names become blob path prefixes, so they must be non-empty,
/// at most 255 characters, and free of `/`.
pub fn validate_folder_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Folder name cannot be empty"));
    }
    if name.chars().count() > MAX_FOLDER_NAME_LEN {
        return Err(AppError::validation(format!(
            "Folder name exceeds {MAX_FOLDER_NAME_LEN} characters"
        )));
    }
    if name.contains('/') || name == "." || name == ".." {
        return Err(AppError::validation(format!("Invalid folder name: {name}")));
    }
    Ok(name)
}
