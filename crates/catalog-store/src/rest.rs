//! HTTP client for a PostgREST-style row API.
//!
//! Tables live under `<base>/rest/v1/<table>`. Every request carries the
//! access key both as `apikey` and as a bearer token. Upserts ask the server to
//! merge duplicates on the conflict column and to echo the written rows.

use std::time::Duration;

use catalog_core::{ProductRecord, CONFLICT_KEY, PRODUCTS_TABLE};
use reqwest::{Client, Response, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{ProductStore, StoreError};

const UPSERT_PREFER: &str = "resolution=merge-duplicates,return=representation";

/// Error envelope returned by the row API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    details: Option<String>,
}

/// Client for the store's REST row API.
///
/// Cheap to share: the inner `reqwest::Client` pools connections and is safe
/// for concurrent use.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl RestStore {
    /// Creates a client for the store at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`StoreError::InvalidBaseUrl`] if `base_url`
    /// does not parse.
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("catalog/0.1 (csv-import)")
            .build()?;

        // Exactly one trailing slash so `Url::join` appends rather than
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| StoreError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Inserts `rows` into `table`, updating rows whose `on_conflict` column
    /// already exists. Returns the rows the server reports as written.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Api`] if the server rejects the batch.
    /// - [`StoreError::Http`] on network failure.
    /// - [`StoreError::Deserialize`] if the echoed rows do not match `R`.
    pub async fn upsert<T, R>(
        &self,
        table: &str,
        rows: &[T],
        on_conflict: &str,
    ) -> Result<Vec<R>, StoreError>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair("on_conflict", on_conflict);

        let response = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", UPSERT_PREFER)
            .json(rows)
            .send()
            .await?;

        read_rows(response, &format!("upsert({table})")).await
    }

    /// Every row of `table`.
    ///
    /// # Errors
    ///
    /// Same as [`RestStore::upsert`].
    pub async fn select_all<R: DeserializeOwned>(&self, table: &str) -> Result<Vec<R>, StoreError> {
        self.select(table, &[("select", "*")]).await
    }

    async fn select<R: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<R>, StoreError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().extend_pairs(params);

        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        read_rows(response, &format!("select({table})")).await
    }

    fn table_url(&self, table: &str) -> Result<Url, StoreError> {
        self.base_url
            .join(&format!("rest/v1/{table}"))
            .map_err(|e| StoreError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}

impl ProductStore for RestStore {
    async fn upsert_products(
        &self,
        rows: &[ProductRecord],
    ) -> Result<Vec<ProductRecord>, StoreError> {
        self.upsert(PRODUCTS_TABLE, rows, CONFLICT_KEY).await
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>, StoreError> {
        self.select_all(PRODUCTS_TABLE).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let _: Vec<serde_json::Value> = self
            .select(PRODUCTS_TABLE, &[("select", CONFLICT_KEY), ("limit", "1")])
            .await?;
        Ok(())
    }
}

async fn read_rows<R: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<Vec<R>, StoreError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = error_message(&body)
            .unwrap_or_else(|| format!("store returned HTTP {}", status.as_u16()));
        tracing::warn!(status = status.as_u16(), %context, %message, "store request rejected");
        return Err(StoreError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|source| StoreError::Deserialize {
        context: context.to_string(),
        source,
    })
}

/// The store's own error text: the envelope's `message` (or `details`), else
/// the raw body, including JSON bodies shaped differently from the envelope.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<ApiErrorBody>(trimmed) {
        Ok(envelope) => envelope
            .message
            .or(envelope.details)
            .filter(|m| !m.is_empty())
            .or_else(|| Some(trimmed.to_string())),
        Err(_) => Some(trimmed.to_string()),
    }
}
