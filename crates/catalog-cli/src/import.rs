//! `import`: run the upload pipeline against a local file.

use std::path::Path;

use anyhow::Context;
use catalog_core::{AppConfig, ImageLocation};
use catalog_ingest::{ingest, report};
use catalog_store::StoreClient;

/// Imports `path` and prints the same JSON body the upload endpoint returns.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the store client cannot be
/// built, or the import does not succeed.
pub(crate) async fn run_import(config: &AppConfig, path: &Path) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let store = StoreClient::from_config(config).await?;
    let images = ImageLocation::new(&config.image_base_url);

    tracing::info!(
        path = %path.display(),
        bytes = bytes.len(),
        backend = %store.backend(),
        "importing csv"
    );

    let report = report(&ingest(&store, &images, &bytes).await);
    println!("{}", serde_json::to_string_pretty(&report.body)?);

    if !report.is_success() {
        anyhow::bail!("import of {} failed ({:?})", path.display(), report.kind);
    }
    Ok(())
}
