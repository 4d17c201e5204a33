//! Bulk copy and move commands.

use clap::{Args, Subcommand};

use docvault_core::error::AppError;
use docvault_core::types::{FileId, FolderId};
use docvault_service::{BulkError, BulkOperation, BulkRequest, Organizer, RequestContext};

use crate::output::{self, OutputFormat};

/// Arguments for bulk commands
#[derive(Debug, Args)]
pub struct BulkArgs {
    /// Bulk subcommand
    #[command(subcommand)]
    pub command: BulkCommand,
}

/// Bulk subcommands
#[derive(Debug, Subcommand)]
pub enum BulkCommand {
    /// Copy every file into every target folder
    Copy {
        /// File IDs, comma-separated
        #[arg(long, value_delimiter = ',', required = true)]
        files: Vec<i64>,
        /// Target folder IDs, comma-separated
        #[arg(long, value_delimiter = ',', required = true)]
        to: Vec<i64>,
    },
    /// Move every file into one target folder
    Move {
        /// File IDs, comma-separated
        #[arg(long, value_delimiter = ',', required = true)]
        files: Vec<i64>,
        /// Target folder IDs; a move accepts exactly one
        #[arg(long, value_delimiter = ',', required = true)]
        to: Vec<i64>,
    },
}

impl BulkArgs {
    /// The service request this command describes.
    pub fn request(&self) -> BulkRequest {
        let (operation, files, to) = match &self.command {
            BulkCommand::Copy { files, to } => (BulkOperation::Copy, files, to),
            BulkCommand::Move { files, to } => (BulkOperation::Move, files, to),
        };
        BulkRequest {
            operation,
            file_ids: files.iter().copied().map(FileId).collect(),
            target_folder_ids: to.iter().copied().map(FolderId).collect(),
        }
    }
}

/// Execute bulk commands
pub async fn execute(
    args: &BulkArgs,
    organizer: &Organizer,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match organizer.bulk.run(ctx, &args.request()).await {
        Ok(report) => {
            output::print_bulk_report(&report, format);
            Ok(())
        }
        Err(BulkError::AllFailed(report)) => {
            output::print_bulk_report(&report, format);
            Err(BulkError::AllFailed(report).into())
        }
        Err(e) => Err(e.into()),
    }
}
