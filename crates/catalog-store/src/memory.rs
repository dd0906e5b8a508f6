//! Process-local product table.
//!
//! Used as the test double for the pipeline and HTTP layer, and as a
//! development backend when no real store is configured.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use catalog_core::ProductRecord;

use crate::{ProductStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<ProductRecord>>,
    failure: Mutex<Option<String>>,
    upsert_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `rows`, in order.
    #[must_use]
    pub fn with_rows(rows: Vec<ProductRecord>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    /// Makes every subsequent call fail with `message` as the store error text.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    pub fn clear_failure(&self) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Number of `upsert_products` calls received, including failed ones.
    #[must_use]
    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Current table contents, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ProductRecord> {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_failure(&self) -> Result<(), StoreError> {
        match self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            Some(message) => Err(StoreError::Api {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl ProductStore for MemoryStore {
    async fn upsert_products(
        &self,
        rows: &[ProductRecord],
    ) -> Result<Vec<ProductRecord>, StoreError> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        let mut table = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        for row in rows {
            match table.iter_mut().find(|existing| existing.sku == row.sku) {
                Some(existing) => {
                    existing.name.clone_from(&row.name);
                    existing.image_url.clone_from(&row.image_url);
                }
                None => table.push(row.clone()),
            }
        }
        drop(table);

        Ok(rows.to_vec())
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.snapshot())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.check_failure()
    }
}
