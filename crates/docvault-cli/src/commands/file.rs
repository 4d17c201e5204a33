//! Single-file CLI commands.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use clap::{Args, Subcommand};

use docvault_core::error::AppError;
use docvault_core::types::{FileId, FolderId};
use docvault_service::{Organizer, RequestContext, UploadItem};

use crate::output::{self, OutcomeRow, OutputFormat};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Show one file
    Show {
        /// File ID
        id: i64,
    },
    /// Upload a local file into a folder
    Upload {
        /// Path to the file to upload
        path: PathBuf,
        /// Target folder ID
        #[arg(long)]
        folder: i64,
        /// Override file name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Upload every file of a local directory into a folder of the same name
    UploadDir {
        /// Directory to upload (not recursive)
        path: PathBuf,
        /// Folder name; defaults to the directory name
        #[arg(long)]
        folder_name: Option<String>,
    },
    /// Copy a file into another folder
    Copy {
        /// File ID
        id: i64,
        /// Target folder ID
        #[arg(long)]
        to: i64,
    },
    /// Move a file into another folder
    Move {
        /// File ID
        id: i64,
        /// Target folder ID
        #[arg(long)]
        to: i64,
    },
    /// Delete a file
    Delete {
        /// File ID
        id: i64,
    },
}

/// Execute file commands
pub async fn execute(
    args: &FileArgs,
    organizer: &Organizer,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        FileCommand::Show { id } => {
            let file = organizer.files.get_file(FileId(*id)).await?;
            output::print_file(&file, format);
        }
        FileCommand::Upload { path, folder, name } => {
            let name = match name {
                Some(name) => name.clone(),
                None => local_file_name(path)?,
            };
            let data = tokio::fs::read(path).await?;
            println!("Uploading '{}' ({} bytes)...", name, data.len());
            let file = organizer
                .uploads
                .upload_file(ctx, FolderId(*folder), UploadItem::new(name, data))
                .await?;
            output::print_file(&file, format);
        }
        FileCommand::UploadDir { path, folder_name } => {
            let folder_name = match folder_name {
                Some(name) => name.clone(),
                None => local_file_name(path)?,
            };
            let items = read_directory(path).await?;
            if items.is_empty() {
                output::print_warning(&format!("No files found in {}", path.display()));
                return Ok(());
            }

            let report = organizer
                .uploads
                .upload_folder(ctx, &folder_name, items)
                .await?;
            match format {
                OutputFormat::Table => {
                    let rows: Vec<OutcomeRow> = report
                        .items
                        .iter()
                        .map(|o| OutcomeRow::new(o.name.clone(), report.folder.name.clone(), &o.result))
                        .collect();
                    output::print_list(&rows, format);
                    let summary = format!(
                        "{} of {} uploaded into '{}'",
                        report.succeeded,
                        report.items.len(),
                        report.folder.name
                    );
                    if report.failed == 0 {
                        output::print_success(&summary);
                    } else {
                        output::print_warning(&summary);
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }
        FileCommand::Copy { id, to } => {
            let copy = organizer
                .transfers
                .copy_file(ctx, FileId(*id), FolderId(*to))
                .await?;
            output::print_success(&format!("Copied as '{}' (id: {})", copy.name, copy.id));
        }
        FileCommand::Move { id, to } => {
            let moved = organizer
                .transfers
                .move_file(ctx, FileId(*id), FolderId(*to))
                .await?;
            output::print_success(&format!(
                "Moved '{}' into folder {}",
                moved.name, moved.folder_id
            ));
        }
        FileCommand::Delete { id } => {
            let file = organizer.files.delete_file(ctx, FileId(*id)).await?;
            output::print_success(&format!("File '{}' deleted", file.name));
        }
    }

    Ok(())
}

fn local_file_name(path: &Path) -> Result<String, AppError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(String::from)
        .ok_or_else(|| AppError::validation(format!("Cannot take a name from {}", path.display())))
}

/// Regular files directly inside `dir`, ordered by name.
async fn read_directory(dir: &Path) -> Result<Vec<UploadItem>, AppError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    let mut items = Vec::with_capacity(paths.len());
    for path in paths {
        let name = local_file_name(&path)?;
        let data = Bytes::from(tokio::fs::read(&path).await?);
        items.push(UploadItem::new(name, data));
    }
    Ok(items)
}
