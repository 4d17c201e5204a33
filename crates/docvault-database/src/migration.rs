//! Catalog schema migrations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;

use docvault_core::error::{AppError, ErrorKind};

/// Run all pending catalog migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running catalog migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Catalog migrations completed");
    Ok(())
}

/// A migration recorded in the catalog.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppliedMigration {
    /// Migration version (the file name's timestamp prefix).
    pub version: i64,
    /// Human-readable description.
    pub description: String,
    /// Whether the migration completed.
    pub success: bool,
    /// When it was applied.
    pub installed_on: DateTime<Utc>,
}

/// List the migrations already applied, oldest first.
pub async fn applied_migrations(pool: &PgPool) -> Result<Vec<AppliedMigration>, AppError> {
    sqlx::query_as::<_, AppliedMigration>(
        "SELECT version, description, success, installed_on \
         FROM _sqlx_migrations ORDER BY version",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        AppError::with_source(
            ErrorKind::StoreUnavailable,
            format!("Failed to read migration history: {e}"),
            e,
        )
    })
}
