use catalog_store::StoreError;
use thiserror::Error;

/// The upload could not be read as CSV.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{0}")]
    Csv(#[from] csv::Error),
}

impl DecodeError {
    /// 1-based line of the offending record, when the parser knows it.
    #[must_use]
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::Csv(err) => err.position().map(csv::Position::line),
        }
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
