use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors a formula cell can display in place of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellError {
    /// Formula text did not match `=FUNC(RANGE)` for a known function
    Formula,
    /// Cell sits on (or downstream of) a reference cycle
    CircularReference,
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellError::Formula => write!(f, "ERROR"),
            CellError::CircularReference => write!(f, "#CIRCULAR!"),
        }
    }
}

/// Errors returned by grid operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Column {col} is outside the grid ({cols} columns)")]
    ColumnOutOfBounds { col: usize, cols: usize },

    #[error("Select a cell first")]
    NoSelection,

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Grid must have at least one row and one column")]
    EmptyGrid,
}

impl GridError {
    /// Stable machine-readable code for the UI layer
    pub fn code(&self) -> &'static str {
        match self {
            GridError::OutOfBounds { .. } => "OUT_OF_BOUNDS",
            GridError::ColumnOutOfBounds { .. } => "COLUMN_OUT_OF_BOUNDS",
            GridError::NoSelection => "NO_SELECTION",
            GridError::InvalidPattern(_) => "INVALID_PATTERN",
            GridError::EmptyGrid => "EMPTY_GRID",
        }
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
