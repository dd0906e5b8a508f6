//! Product store clients.
//!
//! Every backend implements [`ProductStore`]: a single bulk "insert or update
//! on conflict" keyed on `sku`, plus a full-table read for the listing
//! endpoint. The process builds one [`StoreClient`] at startup and shares it
//! across requests; tests substitute [`MemoryStore`].

pub mod memory;
pub mod postgres;
pub mod rest;

use std::future::Future;

use catalog_core::{AppConfig, ProductRecord, StoreBackend};
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::{connect_pool, run_migrations, PgStore, PoolConfig, ProductRow};
pub use rest::RestStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Network or TLS failure talking to the store.
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store rejected the request. `message` is the store's own text.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("invalid store URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("could not decode store response for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Unsupported(&'static str),
}

/// Persistent product table with upsert semantics.
///
/// Implementations must tolerate concurrent calls from independent requests
/// without external locking.
pub trait ProductStore: Send + Sync + 'static {
    /// Inserts rows whose `sku` is new and overwrites `name`/`image_url` of
    /// rows whose `sku` already exists, in one round-trip.
    ///
    /// Returns the rows as persisted by the store.
    ///
    /// # Errors
    ///
    /// Fails as a whole; no row is reported persisted on error.
    fn upsert_products(
        &self,
        rows: &[ProductRecord],
    ) -> impl Future<Output = Result<Vec<ProductRecord>, StoreError>> + Send;

    /// Every product currently in the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    fn list_products(&self) -> impl Future<Output = Result<Vec<ProductRecord>, StoreError>> + Send;

    /// Cheap liveness probe.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is unreachable.
    fn health_check(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// The store selected by configuration.
pub enum StoreClient {
    Rest(RestStore),
    Postgres(PgStore),
    Memory(MemoryStore),
}

impl StoreClient {
    /// Builds the backend named by `config.store_backend`.
    ///
    /// The Postgres backend connects its pool eagerly so misconfiguration
    /// fails at startup rather than on the first upload.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the HTTP client cannot be built, the pool
    /// cannot connect, or a required setting is absent.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        match config.store_backend {
            StoreBackend::Rest => {
                let (Some(url), Some(key)) = (config.store_url.as_deref(), config.store_key.as_deref())
                else {
                    return Err(StoreError::Unsupported(
                        "rest backend requires CATALOG_STORE_URL and CATALOG_STORE_KEY",
                    ));
                };
                Ok(Self::Rest(RestStore::new(url, key, config.store_timeout_secs)?))
            }
            StoreBackend::Postgres => {
                let Some(database_url) = config.database_url.as_deref() else {
                    return Err(StoreError::Unsupported(
                        "postgres backend requires DATABASE_URL",
                    ));
                };
                let pool = connect_pool(database_url, PoolConfig::from_app_config(config)).await?;
                Ok(Self::Postgres(PgStore::new(pool)))
            }
            StoreBackend::Memory => Ok(Self::Memory(MemoryStore::new())),
        }
    }

    #[must_use]
    pub fn backend(&self) -> StoreBackend {
        match self {
            Self::Rest(_) => StoreBackend::Rest,
            Self::Postgres(_) => StoreBackend::Postgres,
            Self::Memory(_) => StoreBackend::Memory,
        }
    }
}

impl ProductStore for StoreClient {
    async fn upsert_products(
        &self,
        rows: &[ProductRecord],
    ) -> Result<Vec<ProductRecord>, StoreError> {
        match self {
            Self::Rest(store) => store.upsert_products(rows).await,
            Self::Postgres(store) => store.upsert_products(rows).await,
            Self::Memory(store) => store.upsert_products(rows).await,
        }
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>, StoreError> {
        match self {
            Self::Rest(store) => store.list_products().await,
            Self::Postgres(store) => store.list_products().await,
            Self::Memory(store) => store.list_products().await,
        }
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        match self {
            Self::Rest(store) => store.health_check().await,
            Self::Postgres(store) => store.health_check().await,
            Self::Memory(store) => store.health_check().await,
        }
    }
}
