//! Dataset loading for the explorer

pub mod sources;

use thiserror::Error;
use tokio::task::JoinError;

use px_core::record::RecordSetError;

// Re-exports
pub use sources::CsvRecordSource;

/// Errors that can occur while loading a dataset
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing projection column '{0}'")]
    MissingProjectionColumn(&'static str),

    #[error("non-numeric value in projection column '{0}'")]
    NonNumericProjection(&'static str),

    #[error("record set error: {0}")]
    Records(#[from] RecordSetError),

    #[error("join error: {0}")]
    Join(#[from] JoinError),
}
