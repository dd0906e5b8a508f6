//! Turns a pipeline result into the caller-facing summary.
//!
//! Only three shapes exist: everything persisted, nothing to do, or
//! everything failed. Store and parser error text is passed through verbatim.

use catalog_core::ProductRecord;
use serde::Serialize;

use crate::error::IngestError;
use crate::pipeline::IngestOutcome;

/// Persisted rows echoed back in a success body.
const SAMPLE_SIZE: usize = 5;

pub const EMPTY_SUBMISSION_MESSAGE: &str = "empty submission";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Success,
    Empty,
    /// The request carried no usable file.
    InputError,
    DecodeFailed,
    StoreFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportBody {
    #[serde(rename_all = "camelCase")]
    Summary {
        message: String,
        row_count: usize,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        sample: Vec<ProductRecord>,
    },
    Error {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: ReportKind,
    pub body: ReportBody,
}

impl Report {
    #[must_use]
    pub fn input_error(message: impl Into<String>) -> Self {
        Self {
            kind: ReportKind::InputError,
            body: ReportBody::Error {
                error: message.into(),
            },
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.kind, ReportKind::Success | ReportKind::Empty)
    }

    /// Rows reported persisted; zero for every non-success outcome.
    #[must_use]
    pub fn row_count(&self) -> usize {
        match &self.body {
            ReportBody::Summary { row_count, .. } => *row_count,
            ReportBody::Error { .. } => 0,
        }
    }
}

#[must_use]
pub fn report(result: &Result<IngestOutcome, IngestError>) -> Report {
    match result {
        Ok(IngestOutcome::Persisted(rows)) => Report {
            kind: ReportKind::Success,
            body: ReportBody::Summary {
                message: format!("{} rows inserted/updated", rows.len()),
                row_count: rows.len(),
                sample: rows.iter().take(SAMPLE_SIZE).cloned().collect(),
            },
        },
        Ok(IngestOutcome::Empty) => Report {
            kind: ReportKind::Empty,
            body: ReportBody::Summary {
                message: EMPTY_SUBMISSION_MESSAGE.to_string(),
                row_count: 0,
                sample: Vec::new(),
            },
        },
        Err(IngestError::Decode(e)) => Report {
            kind: ReportKind::DecodeFailed,
            body: ReportBody::Error {
                error: e.to_string(),
            },
        },
        Err(IngestError::Store(e)) => Report {
            kind: ReportKind::StoreFailed,
            body: ReportBody::Error {
                error: e.to_string(),
            },
        },
    }
}
