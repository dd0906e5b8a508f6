//! Store connectivity and schema commands.

use catalog_core::AppConfig;
use catalog_store::{run_migrations, ProductStore, StoreClient};
use clap::Subcommand;

/// Sub-commands available under `db`.
#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check that the configured store answers
    Ping,
    /// Apply pending migrations (Postgres backend only)
    Migrate,
}

pub(crate) async fn run_db_ping(config: &AppConfig) -> anyhow::Result<()> {
    let store = StoreClient::from_config(config).await?;
    store.health_check().await?;
    println!("store ok ({})", store.backend());
    Ok(())
}

/// # Errors
///
/// Fails for any backend other than Postgres; the REST store's schema is
/// managed on the remote side.
pub(crate) async fn run_db_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let store = StoreClient::from_config(config).await?;
    let StoreClient::Postgres(pg) = &store else {
        anyhow::bail!(
            "db migrate requires CATALOG_STORE_BACKEND=postgres (configured: {})",
            store.backend()
        );
    };

    let applied = run_migrations(pg.pool()).await?;
    tracing::info!(applied, "database migrations complete");
    println!("applied {applied} migration(s)");
    Ok(())
}
