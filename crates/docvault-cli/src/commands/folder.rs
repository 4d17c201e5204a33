//! Folder management CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use docvault_core::error::AppError;
use docvault_core::types::{FileSort, FileSortKey, FolderId, SortDirection};
use docvault_service::{FileQuery, Organizer, RequestContext};

use crate::output::{self, FileRow, FolderRow, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List all folders with their file counts
    List,
    /// Create a new folder
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
    },
    /// Delete an empty folder
    Delete {
        /// Folder ID
        id: i64,
    },
    /// Create every listed folder that does not exist yet
    Import {
        /// Folder names
        names: Vec<String>,
        /// Read additional names from a file, one per line
        #[arg(long)]
        from_file: Option<PathBuf>,
    },
    /// List the files of a folder
    Files {
        /// Folder ID
        #[arg(long, conflicts_with = "name")]
        id: Option<i64>,
        /// Folder name
        #[arg(long)]
        name: Option<String>,
        /// Only names containing this text
        #[arg(long)]
        search: Option<String>,
        /// Only files uploaded by users whose name contains this text
        #[arg(long)]
        uploaded_by: Option<String>,
        /// Sort column
        #[arg(long, value_enum)]
        sort: Option<SortColumn>,
        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
    },
}

/// Column a file listing can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortColumn {
    /// Display name
    Name,
    /// Placement time
    CreatedAt,
    /// File size
    Size,
}

impl From<SortColumn> for FileSortKey {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::Name => Self::Name,
            SortColumn::CreatedAt => Self::CreatedAt,
            SortColumn::Size => Self::FileSize,
        }
    }
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    organizer: &Organizer,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        FolderCommand::List => {
            let folders = organizer.listing.list_folders().await?;
            let rows: Vec<FolderRow> = folders.iter().map(FolderRow::from).collect();
            output::print_list(&rows, format);
        }
        FolderCommand::Create { name } => {
            let folder = organizer.folders.create_folder(ctx, name).await?;
            output::print_success(&format!(
                "Folder '{}' created (id: {})",
                folder.name, folder.id
            ));
        }
        FolderCommand::Delete { id } => {
            organizer.folders.delete_folder(ctx, FolderId(*id)).await?;
            output::print_success(&format!("Folder {id} deleted"));
        }
        FolderCommand::Import { names, from_file } => {
            let mut all = names.clone();
            if let Some(path) = from_file {
                let text = tokio::fs::read_to_string(path).await?;
                all.extend(
                    text.lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .map(String::from),
                );
            }
            let import = organizer.folders.import_folders(ctx, &all).await?;
            output::print_success(&format!(
                "{} folder(s) imported, {} created",
                import.folders.len(),
                import.created
            ));
        }
        FolderCommand::Files {
            id,
            name,
            search,
            uploaded_by,
            sort,
            desc,
        } => {
            let folder_id = match (id, name) {
                (Some(id), _) => FolderId(*id),
                (None, Some(name)) => organizer.folders.get_folder_by_name(name).await?.id,
                (None, None) => {
                    return Err(AppError::validation("Either --id or --name is required"));
                }
            };

            let mut query = FileQuery::new();
            if let Some(search) = search {
                query = query.with_name(search.clone());
            }
            if let Some(uploaded_by) = uploaded_by {
                query = query.with_uploaded_by(uploaded_by.clone());
            }
            if let Some(column) = sort {
                let direction = if *desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };
                query = query.sorted(FileSort::new((*column).into(), direction));
            }

            let files = organizer.listing.query_files(folder_id, &query).await?;
            let rows: Vec<FileRow> = files.iter().map(FileRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
