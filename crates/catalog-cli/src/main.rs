mod db;
mod import;
mod products;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::db::DbCommands;
use crate::products::ProductsCommands;

#[derive(Debug, Parser)]
#[command(name = "catalog-cli")]
#[command(about = "Product catalog command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import a CSV file into the configured store
    Import {
        /// Path to a UTF-8 CSV file with a header row
        path: PathBuf,
    },
    /// Product table queries
    Products {
        #[command(subcommand)]
        command: ProductsCommands,
    },
    /// Database maintenance (Postgres backend)
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = catalog_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Import { path } => import::run_import(&config, &path).await,
        Commands::Products {
            command: ProductsCommands::List,
        } => products::run_products_list(&config).await,
        Commands::Db {
            command: DbCommands::Ping,
        } => db::run_db_ping(&config).await,
        Commands::Db {
            command: DbCommands::Migrate,
        } => db::run_db_migrate(&config).await,
    }
}
