pub mod app_config;
pub mod config;
pub mod products;

pub use app_config::{AppConfig, Environment, StoreBackend};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{
    ImageLocation, ProductRecord, RawRow, CONFLICT_KEY, IMAGE_BUCKET, IMAGE_EXTENSION,
    PRODUCTS_TABLE,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
