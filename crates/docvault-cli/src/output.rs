//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use docvault_entity::file::File;
use docvault_entity::folder::FolderSummary;
use docvault_service::BulkReport;
use docvault_service::transfer::ItemResult;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
pub struct FolderRow {
    /// Folder ID
    pub id: i64,
    /// Name
    pub name: String,
    /// Number of files
    pub files: i64,
    /// Created at
    pub created_at: String,
}

impl From<&FolderSummary> for FolderRow {
    fn from(f: &FolderSummary) -> Self {
        Self {
            id: f.id.get(),
            name: f.name.clone(),
            files: f.total_files,
            created_at: f.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
pub struct FileRow {
    /// File ID
    pub id: i64,
    /// Display name
    pub name: String,
    /// Human-readable size
    pub size: String,
    /// Uploader's name
    pub uploaded_by: String,
    /// Placed at
    pub created_at: String,
}

impl From<&File> for FileRow {
    fn from(f: &File) -> Self {
        Self {
            id: f.id.get(),
            name: f.name.clone(),
            size: f.file_size.clone(),
            uploaded_by: f.uploaded_by_user_name.clone(),
            created_at: f.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// One line of a bulk or folder-upload report
#[derive(Debug, Serialize, Tabled)]
pub struct OutcomeRow {
    /// What was placed
    pub item: String,
    /// Destination
    pub target: String,
    /// `ok` or the error kind
    pub status: String,
    /// Resulting name or error message
    pub detail: String,
}

impl OutcomeRow {
    pub fn new(item: String, target: String, result: &ItemResult) -> Self {
        let (status, detail) = match result {
            ItemResult::Succeeded { file } => ("ok".to_string(), file.name.clone()),
            ItemResult::Failed { kind, message } => (kind.to_string(), message.clone()),
        };
        Self {
            item,
            target,
            status,
            detail,
        }
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print a single file
pub fn print_file(file: &File, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            print_kv("ID", &file.id.to_string());
            print_kv("Name", &file.name);
            print_kv("Folder", &file.folder_id.to_string());
            print_kv("Size", &file.file_size);
            print_kv(
                "Uploaded by",
                &format!("{} ({})", file.uploaded_by_user_name, file.uploaded_by_user_id),
            );
            print_kv("Created at", &file.created_at.to_rfc3339());
            print_kv("URL", &file.url);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(file).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}

/// Print a bulk report
pub fn print_bulk_report(report: &BulkReport, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let rows: Vec<OutcomeRow> = report
                .items
                .iter()
                .map(|i| {
                    OutcomeRow::new(
                        i.file_id.to_string(),
                        i.target_folder_id.to_string(),
                        &i.result,
                    )
                })
                .collect();
            print_list(&rows, format);
            if report.failed == 0 {
                print_success(&format!("{} {}", report.operation, report.summary()));
            } else {
                print_warning(&format!("{} {}", report.operation, report.summary()));
            }
            if !report.touched_folders.is_empty() {
                print_kv("Changed folders", &report.touched_folders.join(", "));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}
