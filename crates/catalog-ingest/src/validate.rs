use catalog_core::ProductRecord;

/// Gate between transform and upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// At least one record; write the batch.
    Proceed,
    /// Nothing to write; skip the store entirely.
    Empty,
}

/// Only the batch size is checked. Individual field values are not inspected.
#[must_use]
pub fn validate(batch: &[ProductRecord]) -> Validation {
    if batch.is_empty() {
        Validation::Empty
    } else {
        Validation::Proceed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_is_empty() {
        assert_eq!(validate(&[]), Validation::Empty);
    }

    #[test]
    fn single_row_proceeds_even_with_blank_fields() {
        let batch = [ProductRecord {
            sku: String::new(),
            name: String::new(),
            image_url: "https://cdn.example.com/product-images/.jpg".to_string(),
        }];
        assert_eq!(validate(&batch), Validation::Proceed);
    }
}
