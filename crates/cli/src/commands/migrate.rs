//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! BOZOR_DATABASE_URL=postgres://localhost/bozor bozor migrate
//! ```
//!
//! Migrations live in `crates/storefront/migrations/` and create the
//! `storefront.kv_entry` table used by the postgres storage backend.

use bozor_storefront::Result;
use bozor_storefront::config::{ConfigError, StorefrontConfig};
use bozor_storefront::storage::{StorageError, create_pool, run_migrations};

/// Run storefront database migrations.
pub async fn run(config: &StorefrontConfig) -> Result<()> {
    let database_url = config
        .database_url
        .as_ref()
        .ok_or_else(|| ConfigError::MissingEnvVar("BOZOR_DATABASE_URL".to_string()))?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(database_url)
        .await
        .map_err(StorageError::from)?;

    tracing::info!("Running migrations...");
    run_migrations(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
