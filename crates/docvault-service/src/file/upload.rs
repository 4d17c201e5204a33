//! File and folder uploads.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use docvault_core::config::{OrganizerConfig, StorageConfig};
use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::traits::BlobStore;
use docvault_core::types::FolderId;
use docvault_database::Catalog;
use docvault_entity::file::{File, NewFile, format_file_size};
use docvault_entity::folder::Folder;
use docvault_storage::paths::upload_path;

use crate::context::{Actor, RequestContext};
use crate::folder::FolderService;
use crate::naming::NameSnapshot;
use crate::transfer::ItemResult;
use crate::transfer::placement::{Placer, RowWrite, content_type_for};

/// One file to upload.
#[derive(Debug, Clone)]
pub struct UploadItem {
    /// Display name requested by the uploader.
    pub name: String,
    /// File contents.
    pub data: Bytes,
    /// Content type; guessed from the name when absent.
    pub content_type: Option<String>,
}

impl UploadItem {
    /// Creates an upload item with a guessed content type.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            content_type: None,
        }
    }
}

/// Outcome of one file in a folder upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadOutcome {
    /// The requested name.
    pub name: String,
    /// What happened.
    pub result: ItemResult,
}

/// Result of uploading a whole folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderUploadReport {
    /// The destination folder.
    pub folder: Folder,
    /// Whether the folder was created by this upload.
    pub folder_created: bool,
    /// One outcome per item, in input order.
    pub items: Vec<UploadOutcome>,
    /// Number of successful items.
    pub succeeded: usize,
    /// Number of failed items.
    pub failed: usize,
}

/// Places new files into folders.
#[derive(Debug, Clone)]
pub struct UploadService {
    placer: Placer,
    folders: FolderService,
    max_upload_size_bytes: u64,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        catalog: Arc<dyn Catalog>,
        blobs: Arc<dyn BlobStore>,
        storage: &StorageConfig,
        organizer: OrganizerConfig,
    ) -> Self {
        Self {
            folders: FolderService::new(catalog.clone()),
            placer: Placer::new(catalog, blobs, organizer),
            max_upload_size_bytes: storage.max_upload_size_bytes,
        }
    }

    /// Upload one file into an existing folder.
    pub async fn upload_file(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        item: UploadItem,
    ) -> AppResult<File> {
        let actor = ctx.require_actor()?;
        let folder = self
            .placer
            .catalog()
            .find_folder(folder_id)
            .await?
            .ok_or_else(|| {
                AppError::target_folder_not_found(format!("Folder {folder_id} not found"))
            })?;
        let mut snapshot = self.placer.listing().existing_names(folder.id).await?;
        self.upload_into(actor, &folder, item, &mut snapshot).await
    }

    /// Upload a set of files into the folder called `folder_name`.
    ///
    /// The folder is created when missing. Items are uploaded one by one; a
    /// failing item does not stop the rest.
    pub async fn upload_folder(
        &self,
        ctx: &RequestContext,
        folder_name: &str,
        items: Vec<UploadItem>,
    ) -> AppResult<FolderUploadReport> {
        let actor = ctx.require_actor()?;
        let (folder, folder_created) = self.folders.ensure_folder(ctx, folder_name).await?;
        let mut snapshot = self.placer.listing().existing_names(folder.id).await?;

        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            let name = item.name.clone();
            let result = self.upload_into(actor, &folder, item, &mut snapshot).await;
            outcomes.push(UploadOutcome {
                name,
                result: ItemResult::from_result(result),
            });
        }

        let succeeded = outcomes.iter().filter(|o| o.result.is_success()).count();
        let failed = outcomes.len() - succeeded;
        info!(
            user_id = %actor.user_id,
            folder = %folder.name,
            succeeded,
            failed,
            "Folder upload finished"
        );
        Ok(FolderUploadReport {
            folder,
            folder_created,
            items: outcomes,
            succeeded,
            failed,
        })
    }

    async fn upload_into(
        &self,
        actor: &Actor,
        folder: &Folder,
        item: UploadItem,
        snapshot: &mut NameSnapshot,
    ) -> AppResult<File> {
        let name = validate_file_name(&item.name)?;
        let size = item.data.len() as u64;
        if size > self.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File '{name}' exceeds maximum upload size of {} bytes",
                self.max_upload_size_bytes
            )));
        }
        let failed = |e: AppError| {
            AppError::wrap(
                ErrorKind::UploadFailed,
                format!("Failed to upload '{name}' into '{}'", folder.name),
                e,
            )
        };

        let content_type = item
            .content_type
            .clone()
            .unwrap_or_else(|| content_type_for(name));
        let final_name = snapshot.resolve(name);
        let path = self
            .put_upload(folder, &final_name, item.data, &content_type)
            .await
            .map_err(failed)?;

        let write = RowWrite::Insert(NewFile {
            name: final_name.clone(),
            url: self.placer.blobs().public_url(&path),
            folder_id: folder.id,
            file_size: format_file_size(size),
            uploaded_by_user_id: actor.user_id.clone(),
            uploaded_by_user_name: actor.user_name.clone(),
            created_at: Utc::now(),
        });
        let file = match self
            .placer
            .commit_named(folder.id, snapshot, name, write)
            .await
        {
            Ok(file) => file,
            Err(e) => {
                self.placer.report_orphan(&path, "upload was not recorded in the catalog");
                return Err(failed(e));
            }
        };

        info!(
            user_id = %actor.user_id,
            file_id = %file.id,
            folder = %folder.name,
            name = %file.name,
            size = %file.file_size,
            "File uploaded"
        );
        Ok(file)
    }

    /// Write to `{folder}/{name}`, or a timestamped path if that is taken.
    async fn put_upload(
        &self,
        folder: &Folder,
        final_name: &str,
        data: Bytes,
        content_type: &str,
    ) -> AppResult<String> {
        let path = upload_path(&folder.name, final_name);
        match self.placer.blobs().put(&path, data.clone(), content_type).await {
            Ok(stored) => Ok(stored),
            Err(e) if e.kind == ErrorKind::ConstraintViolation => {
                debug!(path = %path, "Upload path occupied, using timestamped path");
                self.placer
                    .put_timestamped(&folder.name, final_name, data, content_type)
                    .await
            }
            Err(e) => Err(e),
        }
    }
}

/// Trim and check a file display name.
pub fn validate_file_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("File name cannot be empty"));
    }
    if name.contains('/') || name == "." || name == ".." {
        return Err(AppError::validation(format!("Invalid file name: {name}")));
    }
    Ok(name)
}
