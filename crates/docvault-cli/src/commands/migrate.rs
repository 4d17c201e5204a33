//! Database migration management commands.

use clap::{Args, Subcommand};

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_database::DatabasePool;
use docvault_database::migration;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Show applied migrations
    Status,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    if config.catalog.provider != "postgres" {
        output::print_warning(&format!(
            "Catalog provider '{}' has no schema to migrate",
            config.catalog.provider
        ));
        return Ok(());
    }
    let db = DatabasePool::connect(&config.database).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            migration::run_migrations(db.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Status => {
            let applied = migration::applied_migrations(db.pool()).await?;
            if applied.is_empty() {
                println!("No migrations applied.");
            }
            for m in &applied {
                let status = if m.success { "applied" } else { "failed" };
                println!(
                    "  {} - {} ({status}, {})",
                    m.version,
                    m.description,
                    m.installed_on.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }

    db.close().await;
    Ok(())
}
