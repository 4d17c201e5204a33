//! Catalog construction from configuration.

use std::sync::Arc;

use tracing::info;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;

use crate::catalog::Catalog;
use crate::connection::DatabasePool;
use crate::memory::MemoryCatalog;
use crate::migration::run_migrations;
use crate::postgres::PgCatalog;

/// Open the catalog selected by `catalog.provider`.
pub async fn build_catalog(config: &AppConfig) -> AppResult<Arc<dyn Catalog>> {
    let catalog: Arc<dyn Catalog> = match config.catalog.provider.as_str() {
        "postgres" => {
            let db = DatabasePool::connect(&config.database).await?;
            if config.database.auto_migrate {
                run_migrations(db.pool()).await?;
            }
            Arc::new(PgCatalog::new(db.into_pool()))
        }
        "memory" => Arc::new(MemoryCatalog::new()),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown catalog provider '{other}'"
            )));
        }
    };
    info!(provider = catalog.provider_type(), "Catalog ready");
    Ok(catalog)
}
