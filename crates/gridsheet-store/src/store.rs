use serde::Serialize;
use tracing::{debug, warn};

use crate::config::StoreConfig;
use gridsheet_core::{
    find_and_replace, validate, Cell, CellCoord, CellValue, ColumnType, FormatAttribute, Grid,
    GridError, ReplaceOptions, Result, ValidationPolicy, ValidationResult,
};
use gridsheet_formula::{recalculate, RecalcSummary};

/// Result of writing text into a cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum EditOutcome {
    Stored,
    /// Validation failed; the message is also attached to the cell
    Rejected { message: String },
}

/// Selection-scoped text transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOp {
    Trim,
    Upper,
    Lower,
}

impl TextOp {
    fn apply(&self, text: &str) -> String {
        match self {
            TextOp::Trim => text.trim().to_string(),
            TextOp::Upper => text.to_uppercase(),
            TextOp::Lower => text.to_lowercase(),
        }
    }
}

/// Owns the grid and selection; every content or shape mutation is followed
/// by a recompute pass.
#[derive(Debug, Clone)]
pub struct GridStore {
    grid: Grid,
    selection: Option<CellCoord>,
    config: StoreConfig,
    last_recalc: RecalcSummary,
}

impl Default for GridStore {
    fn default() -> Self {
        Self::from_grid(Grid::default(), StoreConfig::default())
    }
}

impl GridStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store sized by the config
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        let grid = Grid::new(config.rows, config.cols)?;
        Ok(Self::from_grid(grid, config))
    }

    /// Wrap an existing grid, recomputing its values
    pub fn from_grid(grid: Grid, config: StoreConfig) -> Self {
        let mut store = GridStore {
            grid,
            selection: None,
            config,
            last_recalc: RecalcSummary::default(),
        };
        store.recompute();
        store
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.grid.cell(CellCoord::new(row, col))
    }

    pub fn value(&self, row: usize, col: usize) -> CellValue {
        self.grid.value_at(row, col)
    }

    /// Summary of the most recent recompute pass
    pub fn last_recalc(&self) -> RecalcSummary {
        self.last_recalc
    }

    /// Re-derive every displayed value from raw text
    pub fn recompute(&mut self) -> RecalcSummary {
        let summary = recalculate(&mut self.grid, self.config.recalc_mode);
        if summary.circular > 0 {
            warn!(cells = summary.circular, "circular references in grid");
        }
        debug!(evaluated = summary.evaluated, "recompute pass");
        self.last_recalc = summary;
        summary
    }

    /// Validate and store user input, then recompute
    pub fn set_cell(&mut self, row: usize, col: usize, text: &str) -> Result<EditOutcome> {
        let coord = CellCoord::new(row, col);
        let column_type = self.grid.column_type(col).unwrap_or_default();
        let policy = self.config.validation_policy;
        let (rows, cols) = (self.grid.rows(), self.grid.cols());

        let outcome = {
            let cell = self
                .grid
                .cell_mut(coord)
                .ok_or(GridError::OutOfBounds { row, col, rows, cols })?;

            match validate(text, column_type) {
                ValidationResult::Empty => {
                    cell.raw = text.to_string();
                    cell.value = CellValue::Empty;
                    cell.error = None;
                    EditOutcome::Stored
                }
                ValidationResult::Valid(value) => {
                    cell.raw = text.to_string();
                    cell.value = value;
                    cell.error = None;
                    EditOutcome::Stored
                }
                ValidationResult::Invalid(message) => {
                    if policy == ValidationPolicy::Discard {
                        cell.clear_content();
                    }
                    cell.error = Some(message.clone());
                    EditOutcome::Rejected { message }
                }
            }
        };

        match &outcome {
            EditOutcome::Stored => debug!(cell = %coord, "cell updated"),
            EditOutcome::Rejected { message } => {
                warn!(cell = %coord, %column_type, %message, "edit rejected")
            }
        }

        self.recompute();
        Ok(outcome)
    }

    /// Change one presentation attribute; no validation, no recompute
    pub fn set_format(&mut self, row: usize, col: usize, attribute: FormatAttribute) -> Result<()> {
        let coord = CellCoord::new(row, col);
        self.grid.check_bounds(coord)?;
        if let Some(cell) = self.grid.cell_mut(coord) {
            cell.format.apply(attribute);
        }
        Ok(())
    }

    /// Apply a formatting change to the selected cell
    pub fn format_selection(&mut self, attribute: FormatAttribute) -> Result<()> {
        let coord = self.selection.ok_or(GridError::NoSelection)?;
        self.set_format(coord.row, coord.col, attribute)
    }

    pub fn toggle_bold(&mut self) -> Result<()> {
        let bold = self.selected_cell().ok_or(GridError::NoSelection)?.format.bold;
        self.format_selection(FormatAttribute::Bold(!bold))
    }

    pub fn toggle_italic(&mut self) -> Result<()> {
        let italic = self.selected_cell().ok_or(GridError::NoSelection)?.format.italic;
        self.format_selection(FormatAttribute::Italic(!italic))
    }

    pub fn selection(&self) -> Option<CellCoord> {
        self.selection
    }

    pub fn selected_cell(&self) -> Option<&Cell> {
        self.selection.and_then(|coord| self.grid.cell(coord))
    }

    pub fn select(&mut self, row: usize, col: usize) -> Result<()> {
        let coord = CellCoord::new(row, col);
        self.grid.check_bounds(coord)?;
        self.selection = Some(coord);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Drop the selection if it no longer points inside the grid
    fn revalidate_selection(&mut self) {
        if let Some(coord) = self.selection {
            if !self.grid.contains(coord) {
                debug!(cell = %coord, "selection cleared");
                self.selection = None;
            }
        }
    }

    pub fn add_row(&mut self) {
        self.grid.add_row();
        debug!(rows = self.grid.rows(), "row added");
        self.recompute();
    }

    /// Remove the last row; refused on a one-row grid
    pub fn delete_row(&mut self) -> bool {
        if !self.grid.delete_row() {
            return false;
        }
        debug!(rows = self.grid.rows(), "row deleted");
        self.revalidate_selection();
        self.recompute();
        true
    }

    pub fn add_column(&mut self) {
        self.grid.add_column();
        debug!(cols = self.grid.cols(), "column added");
        self.recompute();
    }

    /// Remove the last column; refused on a one-column grid
    pub fn delete_column(&mut self) -> bool {
        if !self.grid.delete_column() {
            return false;
        }
        debug!(cols = self.grid.cols(), "column deleted");
        self.revalidate_selection();
        self.recompute();
        true
    }

    /// Update the column type registry. Existing cells keep their content.
    pub fn set_column_type(&mut self, col: usize, column_type: ColumnType) -> Result<()> {
        self.grid.set_column_type(col, column_type)?;
        debug!(col, %column_type, "column type changed");
        Ok(())
    }

    pub fn column_type(&self, col: usize) -> Option<ColumnType> {
        self.grid.column_type(col)
    }

    /// Transform the selected cell's text. Returns false with no selection.
    pub fn apply_text_op(&mut self, op: TextOp) -> bool {
        let Some(cell) = self.selection.and_then(|coord| self.grid.cell_mut(coord)) else {
            return false;
        };
        cell.map_text(|text| op.apply(text));
        debug!(?op, "text op applied to selection");
        self.recompute();
        true
    }

    pub fn trim(&mut self) -> bool {
        self.apply_text_op(TextOp::Trim)
    }

    pub fn upper(&mut self) -> bool {
        self.apply_text_op(TextOp::Upper)
    }

    pub fn lower(&mut self) -> bool {
        self.apply_text_op(TextOp::Lower)
    }

    /// Drop rows whose raw text repeats an earlier row
    pub fn remove_duplicate_rows(&mut self) -> usize {
        let removed = self.grid.remove_duplicate_rows();
        debug!(removed, "duplicate rows removed");
        self.revalidate_selection();
        self.recompute();
        removed
    }

    /// Global, case-insensitive regex replacement across the whole grid
    pub fn find_and_replace(&mut self, pattern: &str, replacement: &str) -> Result<usize> {
        self.find_and_replace_with(&ReplaceOptions::new(pattern, replacement))
    }

    pub fn find_and_replace_with(&mut self, options: &ReplaceOptions) -> Result<usize> {
        let changed = find_and_replace(&mut self.grid, options)?;
        debug!(pattern = %options.pattern, changed, "find and replace");
        self.recompute();
        Ok(changed)
    }

    /// Swap in a whole new grid (import). Column types and selection reset.
    pub fn replace_grid(&mut self, grid: Grid) {
        debug!(rows = grid.rows(), cols = grid.cols(), "grid replaced");
        self.grid = grid;
        self.grid.reset_column_types();
        self.selection = None;
        self.recompute();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsheet_core::{CellError, CellFormat, Color};
    use gridsheet_formula::{evaluate, RecalcMode};

    fn store(rows: usize, cols: usize) -> GridStore {
        GridStore::with_config(StoreConfig::default().with_size(rows, cols)).unwrap()
    }

    fn raw(store: &GridStore, row: usize, col: usize) -> String {
        store.cell(row, col).unwrap().raw.clone()
    }

    #[test]
    fn test_default_store() {
        let store = GridStore::new();
        assert_eq!((store.rows(), store.cols()), (10, 10));
        assert!(store.selection().is_none());
    }

    #[test]
    fn test_zero_sized_config_rejected() {
        let err = GridStore::with_config(StoreConfig::default().with_size(0, 4)).unwrap_err();
        assert_eq!(err, GridError::EmptyGrid);
    }

    #[test]
    fn test_set_cell_recomputes_formulas() {
        let mut store = store(3, 3);
        store.set_cell(0, 1, "=SUM(A1:A2)").unwrap();
        store.set_cell(0, 0, "3").unwrap();
        store.set_cell(1, 0, "4").unwrap();
        assert_eq!(store.value(0, 1), CellValue::Number(7.0));
        assert_eq!(store.value(0, 1).as_text(), "7");

        store.set_cell(1, 0, "10").unwrap();
        assert_eq!(store.value(0, 1), CellValue::Number(13.0));
    }

    #[test]
    fn test_set_cell_out_of_bounds() {
        let mut store = store(2, 2);
        assert!(matches!(
            store.set_cell(2, 0, "x"),
            Err(GridError::OutOfBounds { row: 2, col: 0, .. })
        ));
    }

    #[test]
    fn test_invalid_number_discards_input() {
        let mut store = store(2, 2);
        store.set_column_type(0, ColumnType::Number).unwrap();
        store.set_cell(0, 0, "12").unwrap();

        let outcome = store.set_cell(0, 0, "twelve").unwrap();
        assert_eq!(
            outcome,
            EditOutcome::Rejected {
                message: "Must be a number".into()
            }
        );
        let cell = store.cell(0, 0).unwrap();
        assert_eq!(cell.raw, "");
        assert_eq!(cell.value, CellValue::Empty);
        assert_eq!(cell.error.as_deref(), Some("Must be a number"));

        store.set_cell(0, 0, "5").unwrap();
        assert!(store.cell(0, 0).unwrap().error.is_none());
    }

    #[test]
    fn test_retain_policy_keeps_previous_value() {
        let config = StoreConfig::default()
            .with_size(2, 2)
            .with_validation_policy(ValidationPolicy::Retain);
        let mut store = GridStore::with_config(config).unwrap();
        store.set_column_type(1, ColumnType::Date).unwrap();
        store.set_cell(0, 1, "Jan 5 2024").unwrap();

        let outcome = store.set_cell(0, 1, "someday").unwrap();
        assert!(matches!(outcome, EditOutcome::Rejected { .. }));
        let cell = store.cell(0, 1).unwrap();
        assert_eq!(cell.raw, "Jan 5 2024");
        assert_eq!(cell.value.as_text(), "2024-01-05");
        assert_eq!(cell.error.as_deref(), Some("Invalid date"));
    }

    #[test]
    fn test_date_value_survives_recompute() {
        let mut store = store(2, 2);
        store.set_column_type(0, ColumnType::Date).unwrap();
        store.set_cell(0, 0, "January 5, 2024").unwrap();
        store.add_row();
        assert_eq!(raw(&store, 0, 0), "January 5, 2024");
        assert_eq!(store.value(0, 0).as_text(), "2024-01-05");
    }

    #[test]
    fn test_blank_input_is_stored_empty() {
        let mut store = store(1, 1);
        store.set_column_type(0, ColumnType::Number).unwrap();
        assert_eq!(store.set_cell(0, 0, "   ").unwrap(), EditOutcome::Stored);
        assert!(store.value(0, 0).is_empty());
        assert!(store.cell(0, 0).unwrap().error.is_none());
    }

    #[test]
    fn test_formula_in_number_column_is_rejected() {
        let mut store = store(2, 2);
        store.set_column_type(1, ColumnType::Number).unwrap();
        let outcome = store.set_cell(0, 1, "=SUM(A1:A2)").unwrap();
        assert!(matches!(outcome, EditOutcome::Rejected { .. }));
    }

    #[test]
    fn test_column_type_change_is_not_retroactive() {
        let mut store = store(2, 2);
        store.set_cell(0, 0, "hello").unwrap();
        store.set_column_type(0, ColumnType::Number).unwrap();
        store.add_row();

        let cell = store.cell(0, 0).unwrap();
        assert_eq!(cell.raw, "hello");
        assert_eq!(cell.value, CellValue::Text("hello".into()));
        assert!(cell.error.is_none());
    }

    #[test]
    fn test_set_format_does_not_touch_content() {
        let mut store = store(2, 2);
        store.set_cell(0, 0, "text").unwrap();
        store.set_format(0, 0, FormatAttribute::Bold(true)).unwrap();
        store
            .set_format(0, 0, FormatAttribute::Color(Color::RED))
            .unwrap();

        let cell = store.cell(0, 0).unwrap();
        assert_eq!(cell.raw, "text");
        assert_eq!(
            cell.format,
            CellFormat::new().with_bold(true).with_color(Color::RED)
        );
    }

    #[test]
    fn test_format_selection_requires_selection() {
        let mut store = store(2, 2);
        assert_eq!(
            store.format_selection(FormatAttribute::FontSize(20)),
            Err(GridError::NoSelection)
        );
        assert_eq!(store.toggle_bold(), Err(GridError::NoSelection));

        store.select(1, 1).unwrap();
        store.format_selection(FormatAttribute::FontSize(20)).unwrap();
        store.toggle_bold().unwrap();
        store.toggle_italic().unwrap();
        store.toggle_italic().unwrap();
        let format = &store.cell(1, 1).unwrap().format;
        assert_eq!(format.font_size, 20);
        assert!(format.bold);
        assert!(!format.italic);
    }

    #[test]
    fn test_select_out_of_bounds() {
        let mut store = store(2, 2);
        assert!(store.select(5, 0).is_err());
        assert!(store.selection().is_none());
    }

    #[test]
    fn test_structural_guards() {
        let mut store = store(1, 1);
        store.set_cell(0, 0, "keep").unwrap();
        assert!(!store.delete_row());
        assert!(!store.delete_column());
        assert_eq!((store.rows(), store.cols()), (1, 1));
        assert_eq!(raw(&store, 0, 0), "keep");
    }

    #[test]
    fn test_add_and_delete_preserve_positions() {
        let mut store = store(2, 2);
        store.set_cell(1, 1, "x").unwrap();
        store.add_row();
        store.add_column();
        assert_eq!((store.rows(), store.cols()), (3, 3));
        assert_eq!(raw(&store, 1, 1), "x");
        assert_eq!(store.column_type(2), Some(ColumnType::Text));

        assert!(store.delete_row());
        assert!(store.delete_column());
        assert_eq!(raw(&store, 1, 1), "x");
    }

    #[test]
    fn test_delete_clears_selection_past_edge() {
        let mut store = store(3, 3);
        store.select(2, 0).unwrap();
        store.delete_row();
        assert!(store.selection().is_none());

        store.select(0, 2).unwrap();
        store.delete_row();
        assert_eq!(store.selection(), Some(CellCoord::new(0, 2)));
        store.delete_column();
        assert!(store.selection().is_none());
    }

    #[test]
    fn test_delete_row_recomputes_dependent_formula() {
        let mut store = store(3, 2);
        store.set_cell(0, 1, "=SUM(A1:A3)").unwrap();
        store.set_cell(0, 0, "1").unwrap();
        store.set_cell(2, 0, "5").unwrap();
        assert_eq!(store.value(0, 1), CellValue::Number(6.0));

        store.delete_row();
        assert_eq!(store.value(0, 1), CellValue::Number(1.0));
    }

    #[test]
    fn test_text_ops_scoped_to_selection() {
        let mut store = store(2, 2);
        store.set_cell(0, 0, "  Mixed Case  ").unwrap();
        store.set_cell(1, 1, "  other  ").unwrap();

        assert!(!store.trim());
        assert_eq!(raw(&store, 0, 0), "  Mixed Case  ");

        store.select(0, 0).unwrap();
        assert!(store.trim());
        assert_eq!(raw(&store, 0, 0), "Mixed Case");
        assert!(store.upper());
        assert_eq!(store.value(0, 0), CellValue::Text("MIXED CASE".into()));
        assert!(store.lower());
        assert_eq!(raw(&store, 0, 0), "mixed case");
        assert_eq!(raw(&store, 1, 1), "  other  ");
    }

    #[test]
    fn test_lowercasing_formula_breaks_it() {
        let mut store = store(2, 2);
        store.set_cell(0, 0, "=SUM(B1:B2)").unwrap();
        store.select(0, 0).unwrap();
        store.lower();
        assert_eq!(store.value(0, 0), CellValue::Error(CellError::Formula));
    }

    #[test]
    fn test_remove_duplicate_rows() {
        let mut store = store(4, 2);
        for (row, (a, b)) in [("a", "1"), ("b", "2"), ("a", "1"), ("b", "3")].iter().enumerate() {
            store.set_cell(row, 0, a).unwrap();
            store.set_cell(row, 1, b).unwrap();
        }
        store.select(3, 0).unwrap();

        assert_eq!(store.remove_duplicate_rows(), 1);
        assert_eq!(
            store.grid().raw_matrix(),
            vec![vec!["a", "1"], vec!["b", "2"], vec!["b", "3"]]
        );
        assert!(store.selection().is_none());

        let once = store.grid().clone();
        assert_eq!(store.remove_duplicate_rows(), 0);
        assert_eq!(store.grid(), &once);
    }

    #[test]
    fn test_find_and_replace_whole_grid() {
        let mut store = store(2, 2);
        store.set_cell(0, 0, "Apple pie").unwrap();
        store.set_cell(1, 1, "APPLE").unwrap();
        store.set_cell(0, 1, "=SUM(A1:A2)").unwrap();

        let changed = store.find_and_replace("apple", "pear").unwrap();
        assert_eq!(changed, 2);
        assert_eq!(raw(&store, 0, 0), "pear pie");
        assert_eq!(store.value(1, 1), CellValue::Text("pear".into()));
    }

    #[test]
    fn test_find_and_replace_can_create_formula() {
        let mut store = store(2, 2);
        store.set_cell(0, 0, "2").unwrap();
        store.set_cell(1, 0, "3").unwrap();
        store.set_cell(0, 1, "total SUM(A1:A2)").unwrap();

        store.find_and_replace("^total ", "=").unwrap();
        assert_eq!(raw(&store, 0, 1), "=SUM(A1:A2)");
        assert_eq!(store.value(0, 1), CellValue::Number(5.0));
    }

    #[test]
    fn test_find_and_replace_invalid_pattern() {
        let mut store = store(1, 1);
        store.set_cell(0, 0, "x").unwrap();
        assert!(matches!(
            store.find_and_replace("[", "y"),
            Err(GridError::InvalidPattern(_))
        ));
        assert_eq!(raw(&store, 0, 0), "x");
    }

    #[test]
    fn test_replace_grid_resets_types_and_selection() {
        let mut store = store(2, 2);
        store.set_column_type(0, ColumnType::Number).unwrap();
        store.select(1, 1).unwrap();

        let grid = Grid::from_rows(vec![vec![Cell::text("4"), Cell::text("=SUM(A1:A1)")]]).unwrap();
        store.replace_grid(grid);

        assert_eq!((store.rows(), store.cols()), (1, 2));
        assert_eq!(store.column_type(0), Some(ColumnType::Text));
        assert!(store.selection().is_none());
        assert_eq!(store.value(0, 1), CellValue::Number(4.0));
    }

    #[test]
    fn test_snapshot_mode_lags_one_pass() {
        let mut store = store(2, 3);
        store.set_cell(0, 0, "5").unwrap();
        store.set_cell(0, 1, "=SUM(A1:A1)").unwrap();
        // B1 already holds 5 from the previous pass
        store.set_cell(0, 2, "=SUM(B1:B1)").unwrap();
        assert_eq!(store.value(0, 2), CellValue::Number(5.0));

        store.set_cell(0, 0, "9").unwrap();
        assert_eq!(store.value(0, 1), CellValue::Number(9.0));
        assert_eq!(store.value(0, 2), CellValue::Number(5.0));

        store.recompute();
        assert_eq!(store.value(0, 2), CellValue::Number(9.0));
    }

    #[test]
    fn test_ordered_mode_converges_and_flags_cycles() {
        let config = StoreConfig::default()
            .with_size(2, 3)
            .with_recalc_mode(RecalcMode::Ordered);
        let mut store = GridStore::with_config(config).unwrap();
        store.set_cell(0, 0, "5").unwrap();
        store.set_cell(0, 1, "=SUM(A1:A1)").unwrap();
        store.set_cell(0, 2, "=SUM(B1:B1)").unwrap();
        store.set_cell(0, 0, "9").unwrap();
        assert_eq!(store.value(0, 2), CellValue::Number(9.0));

        store.set_cell(1, 0, "=SUM(B2:B2)").unwrap();
        store.set_cell(1, 1, "=SUM(A2:A2)").unwrap();
        assert_eq!(store.last_recalc().circular, 2);
        assert_eq!(
            store.value(1, 0),
            CellValue::Error(CellError::CircularReference)
        );
    }

    #[test]
    fn test_recompute_matches_pre_pass_snapshot() {
        let mut store = store(3, 3);
        store.set_cell(0, 0, "1").unwrap();
        store.set_cell(1, 0, "2").unwrap();
        store.set_cell(0, 1, "=AVERAGE(A1:A2)").unwrap();
        store.set_cell(1, 1, "=MAX(A1:B1)").unwrap();
        store.set_cell(2, 2, "=COUNT(A1:B2)").unwrap();

        let snapshot = store.grid().clone();
        store.recompute();

        for coord in store.grid().coords() {
            let cell = store.grid().cell(coord).unwrap();
            if cell.is_formula() {
                assert_eq!(cell.value, evaluate(&cell.raw, &snapshot));
            } else {
                assert_eq!(cell.raw, cell.value.as_text());
            }
        }
    }

    #[test]
    fn test_huge_range_edit_stays_bounded_by_grid() {
        let mut store = store(2, 2);
        store.set_cell(0, 1, "5").unwrap();
        store.set_cell(1, 1, "3").unwrap();
        store.set_cell(0, 0, "=SUM(B1:ZZZZ9999999)").unwrap();
        store.set_cell(1, 0, "=MAX(B1:ZZZZ9999999)").unwrap();

        store.set_cell(1, 1, "7").unwrap();
        assert_eq!(store.value(0, 0), CellValue::Number(12.0));
        assert_eq!(store.value(1, 0), CellValue::Number(7.0));
    }
}
