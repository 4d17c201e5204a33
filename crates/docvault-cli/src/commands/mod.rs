//! CLI command definitions and dispatch.

pub mod bulk;
pub mod file;
pub mod folder;
pub mod migrate;

use clap::{Parser, Subcommand};
use tracing::debug;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_service::{Organizer, RequestContext};

use crate::output::OutputFormat;

/// DocVault: folders of PDF documents
#[derive(Debug, Parser)]
#[command(name = "docvault", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file (without extension)
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay loaded from `config/<env>`
    #[arg(short, long, env = "DOCVAULT_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// ID of the acting user
    #[arg(long, env = "DOCVAULT_USER_ID", global = true)]
    pub user_id: Option<String>,

    /// Display name of the acting user
    #[arg(long, env = "DOCVAULT_USER_NAME", global = true)]
    pub user_name: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// Single-file operations
    File(file::FileArgs),
    /// Copy or move many files at once
    Bulk(bulk::BulkArgs),
}

impl Cli {
    /// Load configuration from the base file, the environment overlay and
    /// `DOCVAULT__*` variables.
    pub fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config, &self.env)
    }

    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Folder(args) => {
                let organizer = open(&config).await?;
                folder::execute(args, &organizer, &self.context(), self.format).await
            }
            Commands::File(args) => {
                let organizer = open(&config).await?;
                file::execute(args, &organizer, &self.context(), self.format).await
            }
            Commands::Bulk(args) => {
                let organizer = open(&config).await?;
                bulk::execute(args, &organizer, &self.context(), self.format).await
            }
        }
    }

    /// The acting user, when both an ID and a name were given.
    fn context(&self) -> RequestContext {
        match (&self.user_id, &self.user_name) {
            (Some(id), Some(name)) => RequestContext::for_user(id.clone(), name.clone()),
            _ => RequestContext::anonymous(),
        }
    }
}

/// Open the configured stores.
async fn open(config: &AppConfig) -> Result<Organizer, AppError> {
    debug!(
        catalog = %config.catalog.provider,
        storage = %config.storage.provider,
        "Opening stores"
    );
    Organizer::from_config(config).await
}

#[cfg(test)]
mod tests {
    use docvault_core::types::FolderId;

    use super::*;

    #[test]
    fn test_parse_bulk_copy() {
        let cli = Cli::try_parse_from([
            "docvault",
            "--user-id",
            "u1",
            "--user-name",
            "Ann",
            "bulk",
            "copy",
            "--files",
            "1,2,3",
            "--to",
            "7,8",
        ])
        .unwrap();
        let Commands::Bulk(args) = &cli.command else {
            panic!("expected bulk command");
        };
        let request = args.request();
        assert_eq!(request.file_ids.len(), 3);
        assert_eq!(request.target_folder_ids, vec![FolderId(7), FolderId(8)]);
        assert!(cli.context().actor.is_some());
    }

    #[test]
    fn test_missing_user_name_is_anonymous() {
        let cli = Cli::try_parse_from(["docvault", "--user-id", "u1", "folder", "list"]).unwrap();
        assert!(cli.context().actor.is_none());
    }

    #[test]
    fn test_format_flag() {
        let cli = Cli::try_parse_from(["docvault", "--format", "json", "folder", "list"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
