pub mod dependency;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod recalc;

pub use dependency::{DependencyGraph, EvaluationOrder};
pub use evaluator::Evaluator;
pub use functions::Aggregate;
pub use parser::{parse_formula, FormulaCall, ParseError};
pub use recalc::{recalculate, RecalcMode, RecalcSummary};

use gridsheet_core::{CellRange, CellValue, Grid};

/// Evaluate raw cell text with a cell lookup over a `rows` x `cols` grid
pub fn evaluate_formula(
    raw: &str,
    rows: usize,
    cols: usize,
    get_cell_value: impl Fn(usize, usize) -> CellValue,
) -> CellValue {
    Evaluator::new(rows, cols, get_cell_value).evaluate(raw)
}

/// Evaluate raw cell text against a grid's current values
pub fn evaluate(raw: &str, grid: &Grid) -> CellValue {
    evaluate_formula(raw, grid.rows(), grid.cols(), |row, col| grid.value_at(row, col))
}

/// The range a formula reads; `None` for anything that is not a
/// well-formed formula
pub fn extract_references(raw: &str) -> Option<CellRange> {
    parse_formula(raw).ok().map(|call| call.range)
}
