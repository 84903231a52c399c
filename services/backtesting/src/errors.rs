//! Errors raised by the file-backed data adapters

use services_common::BacktestError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while loading orders or price history
#[derive(Debug, Error)]
pub enum DataError {
    /// Filesystem failure
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV structure or record
    #[error("CSV error in {location}: {source}")]
    Csv {
        location: String,
        #[source]
        source: csv::Error,
    },

    /// Required header absent from a CSV file
    #[error("Column '{column}' not found in {location}")]
    MissingColumn { location: String, column: String },

    /// A field could not be converted to its expected type
    #[error("Parse error in {location}: {message}")]
    Parse { location: String, message: String },

    /// Well-formed data that breaks a domain rule
    #[error(transparent)]
    Backtest(#[from] BacktestError),
}

/// Result alias for the data adapters
pub type DataResult<T> = std::result::Result<T, DataError>;
