//! Per-transfer state tracking.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use docvault_core::types::{FileId, FolderId};

/// Whether a transfer duplicates or relocates its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferKind {
    /// New blob, new row; source untouched.
    Copy,
    /// New blob, same row; old blob removed afterwards.
    Move,
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy => write!(f, "copy"),
            Self::Move => write!(f, "move"),
        }
    }
}

/// Progress of a single transfer.
///
/// `Pending → BlobWritten → CatalogCommitted → Done`; moves pass through
/// `OldBlobPendingCleanup` before `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    /// Nothing written yet.
    Pending,
    /// The destination blob exists; the catalog does not reference it yet.
    BlobWritten,
    /// The catalog references the destination blob.
    CatalogCommitted,
    /// A move committed; the source blob still has to be removed.
    OldBlobPendingCleanup,
    /// Finished.
    Done,
}

impl TransferState {
    fn can_advance_to(self, next: TransferState, kind: TransferKind) -> bool {
        use TransferState::*;
        matches!(
            (self, next, kind),
            (Pending, BlobWritten, _)
                | (BlobWritten, CatalogCommitted, _)
                | (CatalogCommitted, Done, TransferKind::Copy)
                | (CatalogCommitted, OldBlobPendingCleanup, TransferKind::Move)
                | (OldBlobPendingCleanup, Done, TransferKind::Move)
        )
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::BlobWritten => "blob_written",
            Self::CatalogCommitted => "catalog_committed",
            Self::OldBlobPendingCleanup => "old_blob_pending_cleanup",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

/// Tracks one file travelling to one destination folder.
#[derive(Debug, Clone)]
pub struct Transfer {
    kind: TransferKind,
    file_id: FileId,
    target_folder_id: FolderId,
    state: TransferState,
}

impl Transfer {
    /// Start tracking a transfer in the `Pending` state.
    pub fn new(kind: TransferKind, file_id: FileId, target_folder_id: FolderId) -> Self {
        Self {
            kind,
            file_id,
            target_folder_id,
            state: TransferState::Pending,
        }
    }

    /// Current state.
    pub fn state(&self) -> TransferState {
        self.state
    }

    /// Transfer kind.
    pub fn kind(&self) -> TransferKind {
        self.kind
    }

    /// Move to `next`, logging the transition.
    pub fn advance(&mut self, next: TransferState) {
        debug_assert!(
            self.state.can_advance_to(next, self.kind),
            "invalid {} transition {} -> {}",
            self.kind,
            self.state,
            next
        );
        debug!(
            transfer = %self.kind,
            file_id = %self.file_id,
            target_folder_id = %self.target_folder_id,
            from = %self.state,
            to = %next,
            "Transfer state changed"
        );
        self.state = next;
    }
}
