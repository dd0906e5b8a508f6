//! Raw CSV row to canonical product record.

use catalog_core::{ImageLocation, ProductRecord, RawRow};

use crate::error::DecodeError;

/// Maps one row to a [`ProductRecord`].
///
/// Only `sku` and `name` are read; other columns are ignored. A missing
/// column becomes an empty string. No validation happens here: an empty sku
/// still produces a record (and the image URL `<base>/product-images/.jpg`),
/// leaving rejection to the store's own constraints.
#[must_use]
pub fn transform(row: &RawRow, images: &ImageLocation) -> ProductRecord {
    let sku = row.get("sku").unwrap_or_default().to_string();
    let name = row.get("name").unwrap_or_default().to_string();
    let image_url = images.url_for(&sku);

    ProductRecord {
        sku,
        name,
        image_url,
    }
}

/// Drains `rows` in order and transforms each one.
///
/// # Errors
///
/// Returns the first decode error in the sequence; nothing after it is
/// transformed.
pub fn transform_all<I>(rows: I, images: &ImageLocation) -> Result<Vec<ProductRecord>, DecodeError>
where
    I: IntoIterator<Item = Result<RawRow, DecodeError>>,
{
    rows.into_iter()
        .map(|row| row.map(|row| transform(&row, images)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;

    fn images() -> ImageLocation {
        ImageLocation::new("https://store.example.com/storage/v1/object/public")
    }

    #[test]
    fn derives_image_url_from_sku() {
        let rows = decode(b"sku,name\nA1,Widget\n").expect("decode");
        let batch = transform_all(rows, &images()).expect("transform");

        assert_eq!(
            batch,
            vec![ProductRecord {
                sku: "A1".to_string(),
                name: "Widget".to_string(),
                image_url: "https://store.example.com/storage/v1/object/public/product-images/A1.jpg"
                    .to_string(),
            }]
        );
    }

    #[test]
    fn ignores_image_url_and_extra_columns_from_input() {
        let input = b"image_url,sku,price,name\nhttps://evil.example.com/x.png,B2,3.50,Gadget\n";
        let batch = transform_all(decode(input).expect("decode"), &images()).expect("transform");

        assert_eq!(batch[0].sku, "B2");
        assert_eq!(batch[0].name, "Gadget");
        assert!(batch[0].image_url.ends_with("/product-images/B2.jpg"));
    }

    #[test]
    fn missing_name_column_yields_empty_name() {
        let batch =
            transform_all(decode(b"sku\nA1\n").expect("decode"), &images()).expect("transform");
        assert_eq!(batch[0].name, "");
    }

    #[test]
    fn empty_sku_flows_through_unvalidated() {
        let rows = decode(b"sku,name\n,Nameless\n").expect("decode");
        let batch = transform_all(rows, &images()).expect("transform");

        assert_eq!(batch[0].sku, "");
        assert!(batch[0].image_url.ends_with("/product-images/.jpg"));
    }

    #[test]
    fn values_are_not_trimmed() {
        let rows = decode(b"sku,name\n A1 , Widget \n").expect("decode");
        let batch = transform_all(rows, &images()).expect("transform");
        assert_eq!(batch[0].sku, " A1 ");
        assert_eq!(batch[0].name, " Widget ");
    }

    #[test]
    fn stops_at_first_decode_error() {
        let rows = decode(b"sku,name\nA1,Widget\nbad\n").expect("decode");
        assert!(transform_all(rows, &images()).is_err());
    }

    #[test]
    fn round_trip_reproduces_sku_name_pairs_in_order() {
        let input = "sku,name\nA1,Widget\nB2,Gadget\nC3,\"Thing, with comma\"\nD4,Größe\n";
        let batch = transform_all(decode(input.as_bytes()).expect("decode"), &images())
            .expect("transform");

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(["sku", "name"]).expect("header");
        for record in &batch {
            writer
                .write_record([record.sku.as_str(), record.name.as_str()])
                .expect("row");
        }
        let bytes = writer.into_inner().expect("flush");

        assert_eq!(String::from_utf8(bytes).expect("utf8"), input);
    }
}
