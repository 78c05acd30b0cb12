use crate::parser::{parse_formula, FormulaCall};
use gridsheet_core::{is_formula, CellError, CellValue};

/// Evaluates raw cell text against a cell lookup over a `rows` x `cols` grid
pub struct Evaluator<F>
where
    F: Fn(usize, usize) -> CellValue,
{
    rows: usize,
    cols: usize,
    get_cell_value: F,
}

impl<F> Evaluator<F>
where
    F: Fn(usize, usize) -> CellValue,
{
    /// `get_cell_value` is only called for coordinates inside the extent
    pub fn new(rows: usize, cols: usize, get_cell_value: F) -> Self {
        Self {
            rows,
            cols,
            get_cell_value,
        }
    }

    /// Evaluate raw text to a displayed value.
    ///
    /// Non-formula text passes through unchanged. A formula that does not
    /// parse evaluates to `Error(Formula)`. Results are always numbers.
    pub fn evaluate(&self, raw: &str) -> CellValue {
        if !is_formula(raw) {
            return if raw.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(raw.to_string())
            };
        }

        match parse_formula(raw) {
            Ok(call) => self.evaluate_call(&call),
            Err(_) => CellValue::Error(CellError::Formula),
        }
    }

    /// Gather operands for a parsed call and apply its aggregate. Missing
    /// and non-numeric operands contribute zero. Cells past the grid edge
    /// are counted, not visited, so the work is bounded by the grid.
    pub fn evaluate_call(&self, call: &FormulaCall) -> CellValue {
        let operands: Vec<f64> = call
            .range
            .clip(self.rows, self.cols)
            .map(|inside| {
                inside
                    .cells()
                    .map(|coord| (self.get_cell_value)(coord.row, coord.col).coerce_number())
                    .collect()
            })
            .unwrap_or_default();
        let outside = call.range.area().saturating_sub(operands.len());

        CellValue::Number(call.function.apply_padded(&operands, outside))
    }
}
