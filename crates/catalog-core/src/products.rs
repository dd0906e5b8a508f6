use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Table the catalog is persisted to.
pub const PRODUCTS_TABLE: &str = "products";

/// Column the store uses to decide between insert and update.
pub const CONFLICT_KEY: &str = "sku";

/// Object-storage bucket holding product images.
pub const IMAGE_BUCKET: &str = "product-images";

/// Every product image is addressed as `<sku>.jpg`, whatever the real format.
pub const IMAGE_EXTENSION: &str = "jpg";

/// One data line of an uploaded CSV, keyed by the header row.
///
/// All rows decoded from the same file share a single header allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl RawRow {
    /// Pairs `values` with `headers` positionally. Extra values beyond the
    /// header width are unreachable by name.
    #[must_use]
    pub fn new(headers: Arc<[String]>, values: Vec<String>) -> Self {
        Self { headers, values }
    }

    /// Value of the first column named `column`, if present.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Canonical catalog row as written to and echoed back from the store.
///
/// `image_url` is always derived from `sku` via [`ImageLocation::url_for`];
/// it is never read from uploaded input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub sku: String,
    pub name: String,
    pub image_url: String,
}

/// Public base URL of the object store that serves product images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLocation {
    base_url: String,
}

impl ImageLocation {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base>/product-images/<sku>.jpg`. The sku is inserted verbatim.
    #[must_use]
    pub fn url_for(&self, sku: &str) -> String {
        format!(
            "{}/{IMAGE_BUCKET}/{sku}.{IMAGE_EXTENSION}",
            self.base_url
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Arc<[String]> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn raw_row_get_returns_value_by_column_name() {
        let row = RawRow::new(
            headers(&["sku", "name", "price"]),
            vec!["A1".into(), "Widget".into(), "9.99".into()],
        );
        assert_eq!(row.get("sku"), Some("A1"));
        assert_eq!(row.get("name"), Some("Widget"));
        assert_eq!(row.get("price"), Some("9.99"));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn raw_row_get_uses_first_duplicate_header() {
        let row = RawRow::new(
            headers(&["sku", "sku"]),
            vec!["first".into(), "second".into()],
        );
        assert_eq!(row.get("sku"), Some("first"));
    }

    #[test]
    fn image_location_builds_bucket_url() {
        let images = ImageLocation::new("https://store.example.com/storage/v1/object/public");
        assert_eq!(
            images.url_for("A1"),
            "https://store.example.com/storage/v1/object/public/product-images/A1.jpg"
        );
    }

    #[test]
    fn image_location_trims_trailing_slashes() {
        let images = ImageLocation::new("https://cdn.example.com//");
        assert_eq!(images.base_url(), "https://cdn.example.com");
        assert_eq!(
            images.url_for("B2"),
            "https://cdn.example.com/product-images/B2.jpg"
        );
    }

    #[test]
    fn image_location_keeps_empty_sku() {
        let images = ImageLocation::new("https://cdn.example.com");
        assert_eq!(
            images.url_for(""),
            "https://cdn.example.com/product-images/.jpg"
        );
    }

    #[test]
    fn product_record_ignores_unknown_fields_on_deserialize() {
        let json = r#"{"id":7,"sku":"A1","name":"Widget","image_url":"u","created_at":"2026-01-01"}"#;
        let record: ProductRecord = serde_json::from_str(json).expect("deserialize");
        assert_eq!(record.sku, "A1");
        assert_eq!(record.name, "Widget");
        assert_eq!(record.image_url, "u");
    }
}
