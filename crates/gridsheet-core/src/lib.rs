pub mod cell;
pub mod column;
pub mod error;
pub mod format;
pub mod grid;
pub mod range;
pub mod search;

pub use cell::{is_formula, Cell, CellValue, FORMULA_MARKER};
pub use column::{
    literal_value, parse_date, validate, ColumnType, ValidationPolicy, ValidationResult,
};
pub use error::{CellError, GridError, Result};
pub use format::{CellFormat, Color, FormatAttribute, DEFAULT_FONT_SIZE};
pub use grid::{Grid, DEFAULT_COLS, DEFAULT_ROWS};
pub use range::{col_from_label, col_to_label, parse_range, CellCoord, CellRange};
pub use search::{find_and_replace, ReplaceOptions};
