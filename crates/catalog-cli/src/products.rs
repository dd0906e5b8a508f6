use catalog_core::AppConfig;
use catalog_store::{ProductStore, StoreClient};
use clap::Subcommand;

/// Sub-commands available under `products`.
#[derive(Debug, Subcommand)]
pub enum ProductsCommands {
    /// Print every product in the store as JSON
    List,
}

pub(crate) async fn run_products_list(config: &AppConfig) -> anyhow::Result<()> {
    let store = StoreClient::from_config(config).await?;
    let rows = store.list_products().await?;

    tracing::info!(rows = rows.len(), backend = %store.backend(), "listed products");
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
