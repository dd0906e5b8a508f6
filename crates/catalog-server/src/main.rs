mod api;
mod middleware;

use std::sync::Arc;

use catalog_core::ImageLocation;
use catalog_store::StoreClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, ServeOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = catalog_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = StoreClient::from_config(&config).await?;
    if let StoreClient::Postgres(pg) = &store {
        let applied = catalog_store::run_migrations(pg.pool()).await?;
        tracing::info!(applied, "database migrations complete");
    }
    tracing::info!(
        env = %config.env,
        backend = %store.backend(),
        image_base_url = %config.image_base_url,
        "store client ready"
    );

    let state = AppState {
        store: Arc::new(store),
        images: ImageLocation::new(&config.image_base_url),
    };
    let app = build_app(state, &ServeOptions::from_app_config(&config));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
