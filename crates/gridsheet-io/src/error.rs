//! Import/export error types

use gridsheet_core::GridError;
use thiserror::Error;

pub type IoResult<T> = std::result::Result<T, IoError>;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Input held no records
    #[error("CSV input is empty")]
    Empty,

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}
