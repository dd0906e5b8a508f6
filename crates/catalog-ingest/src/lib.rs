//! CSV catalog import: decode, transform, validate, upsert, report.

pub mod decode;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod transform;
pub mod validate;

pub use decode::{decode, decode_all, RawRows};
pub use error::{DecodeError, IngestError};
pub use pipeline::{ingest, IngestOutcome};
pub use report::{report, Report, ReportBody, ReportKind};
pub use transform::{transform, transform_all};
pub use validate::{validate, Validation};
