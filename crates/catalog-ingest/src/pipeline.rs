//! Upload pipeline orchestration.

use catalog_core::{ImageLocation, ProductRecord};
use catalog_store::ProductStore;

use crate::decode::decode;
use crate::error::IngestError;
use crate::transform::transform_all;
use crate::validate::{validate, Validation};

/// Result of a pipeline run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The store accepted the batch and echoed these rows.
    Persisted(Vec<ProductRecord>),
    /// The upload had no data rows; the store was not called.
    Empty,
}

/// Run the full import for one uploaded file.
///
/// 1. Decode `bytes` as UTF-8 CSV with a header row.
/// 2. Transform every row into a [`ProductRecord`], materializing the batch.
/// 3. Stop with [`IngestOutcome::Empty`] if the batch has no rows.
/// 4. Upsert the whole batch in a single store call keyed on `sku`.
///
/// Nothing is retried. A decode failure anywhere in the file aborts before
/// the store is touched.
///
/// # Errors
///
/// Returns [`IngestError::Decode`] for malformed CSV and
/// [`IngestError::Store`] if the upsert call fails.
pub async fn ingest<S: ProductStore>(
    store: &S,
    images: &ImageLocation,
    bytes: &[u8],
) -> Result<IngestOutcome, IngestError> {
    let batch = decode(bytes)
        .and_then(|rows| {
            tracing::debug!(columns = ?rows.headers(), "csv header read");
            transform_all(rows, images)
        })
        .inspect_err(|e| {
            tracing::warn!(error = %e, line = e.line(), "csv decode failed");
        })?;

    tracing::info!(rows = batch.len(), bytes = bytes.len(), "decoded upload");

    if validate(&batch) == Validation::Empty {
        tracing::info!("upload has no data rows; skipping store call");
        return Ok(IngestOutcome::Empty);
    }

    let persisted = store.upsert_products(&batch).await.inspect_err(|e| {
        tracing::error!(error = %e, rows = batch.len(), "product upsert failed");
    })?;

    tracing::info!(
        submitted = batch.len(),
        persisted = persisted.len(),
        "product upsert complete"
    );

    Ok(IngestOutcome::Persisted(persisted))
}

#[cfg(test)]
mod tests {
    use catalog_store::MemoryStore;

    use super::*;

    fn images() -> ImageLocation {
        ImageLocation::new("https://store.example.com/storage/v1/object/public")
    }

    #[tokio::test]
    async fn every_data_row_reaches_the_store_with_derived_image_url() {
        let store = MemoryStore::new();
        let outcome = ingest(&store, &images(), b"sku,name\nA1,Widget\nB2,Gadget\n")
            .await
            .expect("ingest");

        let IngestOutcome::Persisted(rows) = outcome else {
            panic!("expected persisted outcome");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(store.upsert_calls(), 1);
        for row in store.snapshot() {
            assert_eq!(
                row.image_url,
                format!(
                    "https://store.example.com/storage/v1/object/public/product-images/{}.jpg",
                    row.sku
                )
            );
        }
    }

    #[tokio::test]
    async fn header_only_upload_skips_store() {
        let store = MemoryStore::new();
        let outcome = ingest(&store, &images(), b"sku,name\n")
            .await
            .expect("ingest");

        assert_eq!(outcome, IngestOutcome::Empty);
        assert_eq!(store.upsert_calls(), 0);
    }

    #[tokio::test]
    async fn malformed_csv_never_reaches_store() {
        let store = MemoryStore::new();
        let err = ingest(&store, &images(), b"sku,name\nA1,Widget\nB2\n")
            .await
            .expect_err("should fail");

        assert!(matches!(err, IngestError::Decode(_)));
        assert_eq!(store.upsert_calls(), 0);
    }

    #[tokio::test]
    async fn store_failure_is_returned_as_store_error() {
        let store = MemoryStore::new();
        store.fail_with("connection refused");

        let err = ingest(&store, &images(), b"sku,name\nA1,Widget\n")
            .await
            .expect_err("should fail");

        assert!(matches!(err, IngestError::Store(_)));
        assert_eq!(err.to_string(), "connection refused");
    }

    #[tokio::test]
    async fn reupload_is_idempotent() {
        let store = MemoryStore::new();
        let csv = b"sku,name\nA1,Widget\nB2,Gadget\n";

        ingest(&store, &images(), csv).await.expect("first");
        let after_first = store.len();
        ingest(&store, &images(), csv).await.expect("second");

        assert_eq!(store.len(), after_first);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn reupload_updates_existing_name() {
        let store = MemoryStore::new();

        ingest(&store, &images(), b"sku,name\nA1,Widget\n")
            .await
            .expect("first");
        ingest(&store, &images(), b"sku,name\nA1,Widget v2\n")
            .await
            .expect("second");

        let rows = store.snapshot();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Widget v2");
    }
}
