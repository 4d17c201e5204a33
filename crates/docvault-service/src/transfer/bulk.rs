//! Multi-file, multi-folder copy and move.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::{FileId, FolderId};
use docvault_entity::file::File;
use docvault_entity::folder::Folder;

use crate::context::{Actor, RequestContext};
use crate::naming::NameSnapshot;
use crate::transfer::orchestrator::TransferOrchestrator;

/// Which transfer a bulk request performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkOperation {
    /// Copy every file into every target folder.
    Copy,
    /// Move every file into the single target folder.
    Move,
}

impl fmt::Display for BulkOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy => write!(f, "copy"),
            Self::Move => write!(f, "move"),
        }
    }
}

/// A selection of files and destination folders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkRequest {
    /// Copy or move.
    pub operation: BulkOperation,
    /// Selected files. Duplicates are ignored.
    pub file_ids: Vec<FileId>,
    /// Selected destinations. Duplicates are ignored.
    pub target_folder_ids: Vec<FolderId>,
}

impl BulkRequest {
    /// Copy `file_ids` into each of `target_folder_ids`.
    pub fn copy(file_ids: Vec<FileId>, target_folder_ids: Vec<FolderId>) -> Self {
        Self {
            operation: BulkOperation::Copy,
            file_ids,
            target_folder_ids,
        }
    }

    /// Move `file_ids` into `target_folder_id`.
    pub fn move_to(file_ids: Vec<FileId>, target_folder_id: FolderId) -> Self {
        Self {
            operation: BulkOperation::Move,
            file_ids,
            target_folder_ids: vec![target_folder_id],
        }
    }
}

/// Result of one (file, folder) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemResult {
    /// The file now sits in the target folder.
    Succeeded {
        /// The resulting row.
        file: File,
    },
    /// The pair failed; other pairs were unaffected.
    Failed {
        /// Kind of the innermost error.
        kind: ErrorKind,
        /// Full error chain, outermost first.
        message: String,
    },
}

impl ItemResult {
    /// Record the outcome of one item.
    pub fn from_result(result: AppResult<File>) -> Self {
        match result {
            Ok(file) => Self::Succeeded { file },
            Err(e) => Self::Failed {
                kind: e.root_kind(),
                message: error_chain(&e),
            },
        }
    }

    /// Whether the item succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Outcome of one file landing in one folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkItemOutcome {
    /// The source file.
    pub file_id: FileId,
    /// The destination folder.
    pub target_folder_id: FolderId,
    /// What happened.
    pub result: ItemResult,
}

/// Summary of a finished bulk operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkReport {
    /// Correlates the log lines of one bulk run.
    pub operation_id: Uuid,
    /// Copy or move.
    pub operation: BulkOperation,
    /// One entry per (file, folder) pair, files outer, folders inner.
    pub items: Vec<BulkItemOutcome>,
    /// Number of successful items.
    pub succeeded: usize,
    /// Number of failed items.
    pub failed: usize,
    /// Folders whose contents changed and should be re-listed.
    pub touched_folders: Vec<String>,
}

impl BulkReport {
    /// Total number of items attempted.
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Human-readable tally, e.g. `"3 of 4 succeeded"`.
    pub fn summary(&self) -> String {
        format!("{} of {} succeeded", self.succeeded, self.total())
    }

    /// The failed items.
    pub fn failures(&self) -> impl Iterator<Item = &BulkItemOutcome> {
        self.items.iter().filter(|i| !i.result.is_success())
    }
}

/// Why a bulk operation produced no report of partial success.
#[derive(Debug, Error)]
pub enum BulkError {
    /// The request was refused before any item ran.
    #[error(transparent)]
    Rejected(AppError),
    /// Every item ran and every item failed.
    #[error("{}: every item failed ({})", ErrorKind::PartialBulkFailure, .0.summary())]
    AllFailed(BulkReport),
}

impl BulkError {
    /// Error kind for callers that only branch on kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Rejected(e) => e.kind,
            Self::AllFailed(_) => ErrorKind::PartialBulkFailure,
        }
    }
}

impl From<BulkError> for AppError {
    fn from(e: BulkError) -> Self {
        match e {
            BulkError::Rejected(e) => e,
            BulkError::AllFailed(report) => AppError::new(
                ErrorKind::PartialBulkFailure,
                format!("Every item failed ({})", report.summary()),
            ),
        }
    }
}

/// Runs a bulk request item by item, isolating failures.
///
/// Items run sequentially so that each destination's [`NameSnapshot`] sees
/// the names chosen for earlier items.
#[derive(Debug, Clone)]
pub struct BulkController {
    orchestrator: TransferOrchestrator,
}

impl BulkController {
    /// Creates a new bulk controller.
    pub fn new(orchestrator: TransferOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Run `request`.
    ///
    /// Returns the report when at least one item succeeded.
    pub async fn run(
        &self,
        ctx: &RequestContext,
        request: &BulkRequest,
    ) -> Result<BulkReport, BulkError> {
        let actor = ctx.require_actor().map_err(BulkError::Rejected)?;
        let file_ids = dedupe(&request.file_ids);
        let target_ids = dedupe(&request.target_folder_ids);
        validate_selection(request.operation, &file_ids, &target_ids)
            .map_err(BulkError::Rejected)?;

        let mut targets = Vec::with_capacity(target_ids.len());
        for id in &target_ids {
            targets.push(
                self.orchestrator
                    .resolve_target(*id)
                    .await
                    .map_err(BulkError::Rejected)?,
            );
        }

        let operation_id = Uuid::new_v4();
        info!(
            operation_id = %operation_id,
            operation = %request.operation,
            files = file_ids.len(),
            targets = targets.len(),
            user_id = %actor.user_id,
            "Bulk operation started"
        );

        let mut run = BulkRun::new(request.operation, &targets);
        for file_id in file_ids {
            self.run_file(&mut run, actor, file_id).await;
        }

        let report = run.finish(operation_id);
        if report.succeeded == 0 {
            warn!(operation_id = %operation_id, summary = %report.summary(), "Bulk operation failed");
            return Err(BulkError::AllFailed(report));
        }
        info!(operation_id = %operation_id, summary = %report.summary(), "Bulk operation finished");
        Ok(report)
    }

    async fn run_file(&self, run: &mut BulkRun<'_>, actor: &Actor, file_id: FileId) {
        let source = match self.orchestrator.load_source(file_id).await {
            Ok(source) => source,
            Err(e) => {
                for target in run.targets {
                    run.record(file_id, target.id, Err(e.clone()));
                }
                return;
            }
        };

        let operation = run.operation;
        let mut payload: Option<AppResult<Bytes>> = None;
        for target in run.targets {
            let snapshot = match run.snapshot_for(self, target).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    run.record(file_id, target.id, Err(e));
                    continue;
                }
            };
            let result = self
                .place(operation, actor, &source, &mut payload, target, snapshot)
                .await;
            let changed = match &result {
                Ok(placed) => operation == BulkOperation::Copy || placed.folder_id != source.folder_id,
                Err(_) => false,
            };
            if changed {
                run.touch(target.name.clone());
                if operation == BulkOperation::Move {
                    self.touch_source_folder(run, source.folder_id).await;
                }
            }
            run.record(file_id, target.id, result);
        }
    }

    async fn place(
        &self,
        operation: BulkOperation,
        actor: &Actor,
        source: &File,
        payload: &mut Option<AppResult<Bytes>>,
        target: &Folder,
        snapshot: &mut NameSnapshot,
    ) -> AppResult<File> {
        if operation == BulkOperation::Move && source.folder_id == target.id {
            return Ok(source.clone());
        }
        let data = match payload {
            Some(loaded) => loaded.clone()?,
            None => {
                let loaded = self.orchestrator.read_payload(source).await;
                *payload = Some(loaded.clone());
                loaded?
            }
        };
        match operation {
            BulkOperation::Copy => {
                self.orchestrator
                    .copy_into(actor, source, data, target, snapshot)
                    .await
            }
            BulkOperation::Move => {
                self.orchestrator
                    .move_into(actor, source, data, target, snapshot)
                    .await
            }
        }
    }

    async fn touch_source_folder(&self, run: &mut BulkRun<'_>, folder_id: FolderId) {
        if let Some(name) = run.source_folders.get(&folder_id) {
            run.touch(name.clone());
            return;
        }
        match self.orchestrator.folder_name(folder_id).await {
            Ok(Some(name)) => {
                run.source_folders.insert(folder_id, name.clone());
                run.touch(name);
            }
            Ok(None) => {}
            Err(e) => warn!(folder_id = %folder_id, error = %e, "Could not resolve source folder name"),
        }
    }
}

/// Mutable state of one bulk run.
struct BulkRun<'a> {
    operation: BulkOperation,
    targets: &'a [Folder],
    snapshots: HashMap<FolderId, NameSnapshot>,
    source_folders: HashMap<FolderId, String>,
    items: Vec<BulkItemOutcome>,
    touched: Vec<String>,
}

impl<'a> BulkRun<'a> {
    fn new(operation: BulkOperation, targets: &'a [Folder]) -> Self {
        Self {
            operation,
            targets,
            snapshots: HashMap::new(),
            source_folders: HashMap::new(),
            items: Vec::new(),
            touched: Vec::new(),
        }
    }

    /// The destination's names, fetched on first use and kept for the run.
    async fn snapshot_for(
        &mut self,
        controller: &BulkController,
        target: &Folder,
    ) -> AppResult<&mut NameSnapshot> {
        if !self.snapshots.contains_key(&target.id) {
            let snapshot = controller
                .orchestrator
                .listing()
                .existing_names(target.id)
                .await?;
            self.snapshots.insert(target.id, snapshot);
        }
        Ok(self.snapshots.entry(target.id).or_default())
    }

    fn record(&mut self, file_id: FileId, target_folder_id: FolderId, result: AppResult<File>) {
        if let Err(e) = &result {
            warn!(file_id = %file_id, target_folder_id = %target_folder_id, error = %e, "Bulk item failed");
        }
        self.items.push(BulkItemOutcome {
            file_id,
            target_folder_id,
            result: ItemResult::from_result(result),
        });
    }

    fn touch(&mut self, folder_name: String) {
        if !self.touched.contains(&folder_name) {
            self.touched.push(folder_name);
        }
    }

    fn finish(self, operation_id: Uuid) -> BulkReport {
        let succeeded = self.items.iter().filter(|i| i.result.is_success()).count();
        BulkReport {
            operation_id,
            operation: self.operation,
            failed: self.items.len() - succeeded,
            succeeded,
            items: self.items,
            touched_folders: self.touched,
        }
    }
}

fn validate_selection(
    operation: BulkOperation,
    file_ids: &[FileId],
    target_ids: &[FolderId],
) -> AppResult<()> {
    if file_ids.is_empty() {
        return Err(AppError::validation("No files selected"));
    }
    if target_ids.is_empty() {
        return Err(AppError::validation("No target folders selected"));
    }
    if operation == BulkOperation::Move && target_ids.len() != 1 {
        return Err(AppError::invalid_bulk_move(format!(
            "A move needs exactly one target folder, got {}",
            target_ids.len()
        )));
    }
    Ok(())
}

/// Drop repeated IDs, keeping first occurrences in order.
fn dedupe<T: Copy + Eq + Hash>(ids: &[T]) -> Vec<T> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Render an error and its causes, outermost first.
fn error_chain(e: &AppError) -> String {
    let mut message = e.to_string();
    let mut current = std::error::Error::source(e);
    while let Some(cause) = current {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        current = cause.source();
    }
    message
}
