//! CSV decoding of an in-memory upload.
//!
//! The buffer is read as UTF-8, comma-delimited, with the first record as
//! the header. Rows are produced lazily; any malformed record (ragged column
//! count, invalid UTF-8) fails the whole decode when it is reached.

use std::sync::Arc;

use catalog_core::RawRow;
use csv::{ReaderBuilder, StringRecordsIntoIter};

use crate::error::DecodeError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Lazy sequence of rows over one upload buffer.
pub struct RawRows<'a> {
    headers: Arc<[String]>,
    records: StringRecordsIntoIter<&'a [u8]>,
}

impl RawRows<'_> {
    /// Column names from the header record, in file order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl Iterator for RawRows<'_> {
    type Item = Result<RawRow, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(DecodeError::from(e))),
        };
        let values = record.iter().map(str::to_owned).collect();
        Some(Ok(RawRow::new(Arc::clone(&self.headers), values)))
    }
}

/// Reads the header record of `bytes` and returns the remaining rows lazily.
///
/// An empty buffer yields no headers and no rows.
///
/// # Errors
///
/// Returns [`DecodeError`] if the header record is not valid CSV or UTF-8.
pub fn decode(bytes: &[u8]) -> Result<RawRows<'_>, DecodeError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .flexible(false)
        .from_reader(bytes);

    let headers: Arc<[String]> = reader.headers()?.iter().map(str::to_owned).collect();

    Ok(RawRows {
        headers,
        records: reader.into_records(),
    })
}

/// Decodes every row of `bytes` into memory.
///
/// # Errors
///
/// Returns the first [`DecodeError`] encountered.
pub fn decode_all(bytes: &[u8]) -> Result<Vec<RawRow>, DecodeError> {
    decode(bytes)?.collect()
}
