//! CSV error types

use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur during CSV operations
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The file has more rows or columns than a sheet can hold
    #[error("CSV data does not fit in a sheet: {0}")]
    TooLarge(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] sheetproof_core::Error),
}
