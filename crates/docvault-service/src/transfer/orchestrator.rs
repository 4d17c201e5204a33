//! Single-file copy and move.
//!
//! Neither store offers transactions, so a transfer is a fixed sequence of
//! independent writes: new blob, then catalog row, then (for moves) removal
//! of the old blob. A failure before the catalog write surfaces as
//! `CopyFailed`/`MoveFailed`; a blob written before a failed catalog write
//! is left behind and logged. Once the catalog write succeeds the transfer
//! has succeeded, whatever happens to the old blob.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};

use docvault_core::config::OrganizerConfig;
use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::traits::BlobStore;
use docvault_core::types::{FileId, FolderId};
use docvault_database::Catalog;
use docvault_entity::file::{File, FilePlacement, NewFile};
use docvault_entity::folder::Folder;

use crate::context::{Actor, RequestContext};
use crate::listing::ListingService;
use crate::naming::NameSnapshot;
use crate::transfer::placement::{Placer, RowWrite, content_type_for};
use crate::transfer::state::{Transfer, TransferKind, TransferState};

/// Copies and moves files between folders.
#[derive(Debug, Clone)]
pub struct TransferOrchestrator {
    placer: Placer,
}

impl TransferOrchestrator {
    /// Creates a new orchestrator.
    pub fn new(
        catalog: Arc<dyn Catalog>,
        blobs: Arc<dyn BlobStore>,
        organizer: OrganizerConfig,
    ) -> Self {
        Self {
            placer: Placer::new(catalog, blobs, organizer),
        }
    }

    /// Copy a file into another folder, creating a new row.
    ///
    /// The copy keeps the source's size, gets a disambiguated name, and is
    /// attributed to the acting user.
    pub async fn copy_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        target_folder_id: FolderId,
    ) -> AppResult<File> {
        let actor = ctx.require_actor()?;
        let source = self.load_source(file_id).await?;
        let target = self.resolve_target(target_folder_id).await?;
        let payload = self.read_payload(&source).await?;
        let mut snapshot = self.placer.listing().existing_names(target.id).await?;
        self.copy_into(actor, &source, payload, &target, &mut snapshot)
            .await
    }

    /// Move a file into another folder, keeping its ID.
    ///
    /// Moving a file into the folder it is already in changes nothing.
    pub async fn move_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        target_folder_id: FolderId,
    ) -> AppResult<File> {
        let actor = ctx.require_actor()?;
        let source = self.load_source(file_id).await?;
        let target = self.resolve_target(target_folder_id).await?;
        if source.folder_id == target.id {
            info!(file_id = %file_id, folder = %target.name, "File already in target folder");
            return Ok(source);
        }
        let payload = self.read_payload(&source).await?;
        let mut snapshot = self.placer.listing().existing_names(target.id).await?;
        self.move_into(actor, &source, payload, &target, &mut snapshot)
            .await
    }

    /// The listing service the orchestrator reads folder names through.
    pub(crate) fn listing(&self) -> &ListingService {
        self.placer.listing()
    }

    /// Load the row a transfer reads from.
    pub(crate) async fn load_source(&self, file_id: FileId) -> AppResult<File> {
        self.placer
            .catalog()
            .find_file(file_id)
            .await?
            .ok_or_else(|| AppError::source_not_found(format!("File {file_id} not found")))
    }

    /// Load a destination folder.
    pub(crate) async fn resolve_target(&self, folder_id: FolderId) -> AppResult<Folder> {
        self.placer
            .catalog()
            .find_folder(folder_id)
            .await?
            .ok_or_else(|| {
                AppError::target_folder_not_found(format!("Target folder {folder_id} not found"))
            })
    }

    /// Name of a folder, if it still exists.
    pub(crate) async fn folder_name(&self, folder_id: FolderId) -> AppResult<Option<String>> {
        Ok(self
            .placer
            .catalog()
            .find_folder(folder_id)
            .await?
            .map(|f| f.name))
    }

    /// Read the source blob addressed by the row's URL.
    pub(crate) async fn read_payload(&self, source: &File) -> AppResult<Bytes> {
        let blobs = self.placer.blobs();
        let path = blobs.path_from_url(&source.url).ok_or_else(|| {
            AppError::source_not_found(format!(
                "File {} points at a URL outside the blob store: {}",
                source.id, source.url
            ))
        })?;
        blobs.get(&path).await.map_err(|e| {
            if e.kind == ErrorKind::NotFound {
                AppError::source_not_found(format!("Blob of file {} is missing: {path}", source.id))
            } else {
                e
            }
        })
    }

    /// Copy `source` into `target` using an already loaded payload.
    pub(crate) async fn copy_into(
        &self,
        actor: &Actor,
        source: &File,
        payload: Bytes,
        target: &Folder,
        snapshot: &mut NameSnapshot,
    ) -> AppResult<File> {
        let failed = |e: AppError| {
            AppError::wrap(
                ErrorKind::CopyFailed,
                format!("Failed to copy '{}' into '{}'", source.name, target.name),
                e,
            )
        };
        let mut transfer = Transfer::new(TransferKind::Copy, source.id, target.id);

        let path = self
            .placer
            .put_timestamped(
                &target.name,
                &source.name,
                payload,
                &content_type_for(&source.name),
            )
            .await
            .map_err(failed)?;
        transfer.advance(TransferState::BlobWritten);

        let write = RowWrite::Insert(NewFile {
            name: source.name.clone(),
            url: self.placer.blobs().public_url(&path),
            folder_id: target.id,
            file_size: source.file_size.clone(),
            uploaded_by_user_id: actor.user_id.clone(),
            uploaded_by_user_name: actor.user_name.clone(),
            created_at: Utc::now(),
        });
        let copy = match self
            .placer
            .commit_named(target.id, snapshot, &source.name, write)
            .await
        {
            Ok(copy) => copy,
            Err(e) => {
                self.placer.report_orphan(&path, "copy was not recorded in the catalog");
                return Err(failed(e));
            }
        };
        transfer.advance(TransferState::CatalogCommitted);
        transfer.advance(TransferState::Done);

        info!(
            user_id = %actor.user_id,
            source_id = %source.id,
            copy_id = %copy.id,
            folder = %target.name,
            name = %copy.name,
            "File copied"
        );
        Ok(copy)
    }

    /// Move `source` into `target` using an already loaded payload.
    pub(crate) async fn move_into(
        &self,
        actor: &Actor,
        source: &File,
        payload: Bytes,
        target: &Folder,
        snapshot: &mut NameSnapshot,
    ) -> AppResult<File> {
        if source.folder_id == target.id {
            return Ok(source.clone());
        }
        let failed = |e: AppError| {
            AppError::wrap(
                ErrorKind::MoveFailed,
                format!("Failed to move '{}' into '{}'", source.name, target.name),
                e,
            )
        };
        let mut transfer = Transfer::new(TransferKind::Move, source.id, target.id);

        let path = self
            .placer
            .put_timestamped(
                &target.name,
                &source.name,
                payload,
                &content_type_for(&source.name),
            )
            .await
            .map_err(failed)?;
        transfer.advance(TransferState::BlobWritten);

        let write = RowWrite::Relocate(
            source.id,
            FilePlacement {
                folder_id: target.id,
                name: source.name.clone(),
                url: self.placer.blobs().public_url(&path),
                uploaded_by_user_id: actor.user_id.clone(),
                uploaded_by_user_name: actor.user_name.clone(),
                created_at: Utc::now(),
            },
        );
        let moved = match self
            .placer
            .commit_named(target.id, snapshot, &source.name, write)
            .await
        {
            Ok(moved) => moved,
            Err(e) => {
                self.placer.report_orphan(&path, "move was not recorded in the catalog");
                return Err(failed(e));
            }
        };
        transfer.advance(TransferState::CatalogCommitted);

        transfer.advance(TransferState::OldBlobPendingCleanup);
        self.remove_old_blob(source).await;
        transfer.advance(TransferState::Done);

        info!(
            user_id = %actor.user_id,
            file_id = %moved.id,
            from_folder_id = %source.folder_id,
            folder = %target.name,
            name = %moved.name,
            "File moved"
        );
        Ok(moved)
    }

    async fn remove_old_blob(&self, source: &File) {
        let blobs = self.placer.blobs();
        let Some(old_path) = blobs.path_from_url(&source.url) else {
            warn!(file_id = %source.id, url = %source.url, "Old blob URL not recognised, leaving it in place");
            return;
        };
        if let Err(e) = blobs.delete(std::slice::from_ref(&old_path)).await {
            warn!(file_id = %source.id, error = %e, "Failed to delete old blob after move");
            self.placer.report_orphan(&old_path, "old blob of a moved file");
        }
    }
}
