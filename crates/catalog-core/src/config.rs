use crate::app_config::{AppConfig, Environment, StoreBackend};
use crate::ConfigError;

/// Path appended to the store URL to reach publicly readable objects when
/// `CATALOG_IMAGE_BASE_URL` is not set explicitly.
const PUBLIC_OBJECT_PATH: &str = "/storage/v1/object/public";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::{IpAddr, SocketAddr};
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("CATALOG_ENV", "development"));

    let port = or_default("PORT", "3000")
        .parse::<u16>()
        .map_err(|e| invalid("PORT", e.to_string()))?;
    let host = or_default("CATALOG_HOST", "0.0.0.0");
    let ip = host
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .map_err(|e| invalid("CATALOG_HOST", e.to_string()))?;
    let bind_addr = SocketAddr::new(ip, port);

    let log_level = or_default("CATALOG_LOG_LEVEL", "info");

    let store_backend = parse_store_backend(&or_default("CATALOG_STORE_BACKEND", "rest"))
        .ok_or_else(|| {
            invalid(
                "CATALOG_STORE_BACKEND",
                "expected one of: rest, postgres, memory".to_string(),
            )
        })?;

    let (store_url, store_key, database_url) = match store_backend {
        StoreBackend::Rest => (
            Some(require("CATALOG_STORE_URL")?),
            Some(require("CATALOG_STORE_KEY")?),
            lookup("DATABASE_URL").ok(),
        ),
        StoreBackend::Postgres => (
            lookup("CATALOG_STORE_URL").ok(),
            lookup("CATALOG_STORE_KEY").ok(),
            Some(require("DATABASE_URL")?),
        ),
        StoreBackend::Memory => (
            lookup("CATALOG_STORE_URL").ok(),
            lookup("CATALOG_STORE_KEY").ok(),
            lookup("DATABASE_URL").ok(),
        ),
    };

    let image_base_url = match lookup("CATALOG_IMAGE_BASE_URL") {
        Ok(explicit) if !explicit.trim().is_empty() => explicit,
        _ => match store_url.as_deref() {
            Some(url) => format!("{}{PUBLIC_OBJECT_PATH}", url.trim_end_matches('/')),
            None => return Err(ConfigError::MissingEnvVar("CATALOG_IMAGE_BASE_URL".into())),
        },
    };

    let store_timeout_secs = parse_u64("CATALOG_STORE_TIMEOUT_SECS", "30")?;
    let db_max_connections = parse_u32("CATALOG_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("CATALOG_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("CATALOG_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    let max_upload_bytes = parse_usize("CATALOG_MAX_UPLOAD_BYTES", "10485760")?;
    let static_dir = PathBuf::from(or_default("CATALOG_STATIC_DIR", "./public"));

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        store_backend,
        store_url,
        store_key,
        database_url,
        image_base_url,
        store_timeout_secs,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        max_upload_bytes,
        static_dir,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_store_backend(s: &str) -> Option<StoreBackend> {
    match s.trim().to_ascii_lowercase().as_str() {
        "rest" => Some(StoreBackend::Rest),
        "postgres" | "postgresql" => Some(StoreBackend::Postgres),
        "memory" => Some(StoreBackend::Memory),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
