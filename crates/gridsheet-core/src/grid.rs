use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

use crate::cell::{Cell, CellValue};
use crate::column::ColumnType;
use crate::error::{GridError, Result};
use crate::range::CellCoord;

/// Default grid dimensions for a fresh editor
pub const DEFAULT_ROWS: usize = 10;
pub const DEFAULT_COLS: usize = 10;

/// Rectangular grid of cells with a parallel column-type registry.
///
/// Every row has `cols()` cells and there is always at least one row and one
/// column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
    column_types: Vec<ColumnType>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::blank(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

impl Grid {
    /// Create an empty grid of the given size
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyGrid);
        }
        Ok(Self::blank(rows, cols))
    }

    fn blank(rows: usize, cols: usize) -> Self {
        Grid {
            cells: vec![vec![Cell::default(); cols]; rows],
            column_types: vec![ColumnType::default(); cols],
        }
    }

    /// Build a grid from (possibly ragged) rows, padding short rows with
    /// empty cells. All columns are typed as text.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self> {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(GridError::EmptyGrid);
        }

        let cells = rows
            .into_iter()
            .map(|mut row| {
                row.resize_with(cols, Cell::default);
                row
            })
            .collect();

        Ok(Grid {
            cells,
            column_types: vec![ColumnType::default(); cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.column_types.len()
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.row < self.rows() && coord.col < self.cols()
    }

    /// Return `OutOfBounds` unless the coordinate lies inside the grid
    pub fn check_bounds(&self, coord: CellCoord) -> Result<()> {
        if self.contains(coord) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                row: coord.row,
                col: coord.col,
                rows: self.rows(),
                cols: self.cols(),
            })
        }
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.cells.get(coord.row)?.get(coord.col)
    }

    pub fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.cells.get_mut(coord.row)?.get_mut(coord.col)
    }

    /// Displayed value at a position; `Empty` outside the grid
    pub fn value_at(&self, row: usize, col: usize) -> CellValue {
        self.cell(CellCoord::new(row, col))
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    /// Iterate every coordinate in row-major order
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let cols = self.cols();
        (0..self.rows()).flat_map(move |row| (0..cols).map(move |col| CellCoord::new(row, col)))
    }

    pub fn row_slice(&self, row: usize) -> Option<&[Cell]> {
        self.cells.get(row).map(Vec::as_slice)
    }

    pub fn column_type(&self, col: usize) -> Option<ColumnType> {
        self.column_types.get(col).copied()
    }

    pub fn column_types(&self) -> &[ColumnType] {
        &self.column_types
    }

    /// Change a column's type. Existing cells are not re-validated.
    pub fn set_column_type(&mut self, col: usize, column_type: ColumnType) -> Result<()> {
        let cols = self.cols();
        let slot = self
            .column_types
            .get_mut(col)
            .ok_or(GridError::ColumnOutOfBounds { col, cols })?;
        *slot = column_type;
        Ok(())
    }

    /// Set every column back to the default (text) type
    pub fn reset_column_types(&mut self) {
        self.column_types.fill(ColumnType::default());
    }

    /// Append an empty row sized to the current column count
    pub fn add_row(&mut self) {
        self.cells.push(vec![Cell::default(); self.cols()]);
    }

    /// Remove the last row. Returns false (and does nothing) on a one-row grid.
    pub fn delete_row(&mut self) -> bool {
        if self.rows() <= 1 {
            return false;
        }
        self.cells.pop();
        true
    }

    /// Append an empty text column to every row
    pub fn add_column(&mut self) {
        for row in &mut self.cells {
            row.push(Cell::default());
        }
        self.column_types.push(ColumnType::default());
    }

    /// Remove the last column. Returns false (and does nothing) on a
    /// one-column grid.
    pub fn delete_column(&mut self) -> bool {
        if self.cols() <= 1 {
            return false;
        }
        for row in &mut self.cells {
            row.pop();
        }
        self.column_types.pop();
        true
    }

    /// Drop rows whose raw text sequence already appeared earlier, keeping
    /// the first occurrence. Returns the number of rows removed.
    pub fn remove_duplicate_rows(&mut self) -> usize {
        let before = self.rows();
        let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(before);
        self.cells
            .retain(|row| seen.insert(row.iter().map(|c| c.raw.clone()).collect()));
        before - self.rows()
    }

    /// Rewrite raw and displayed text of every cell, replacing all matches.
    /// Returns the number of cells whose raw text changed.
    pub(crate) fn replace_all(&mut self, pattern: &Regex, replacement: &str) -> usize {
        let mut changed = 0;
        for cell in self.cells.iter_mut().flatten() {
            let before = cell.raw.clone();
            cell.map_text(|text| pattern.replace_all(text, replacement).into_owned());
            if cell.raw != before {
                changed += 1;
            }
        }
        changed
    }

    /// Displayed text of every cell, row by row
    pub fn value_matrix(&self) -> Vec<Vec<String>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(Cell::display_value).collect())
            .collect()
    }

    /// Raw text of every cell, row by row
    pub fn raw_matrix(&self) -> Vec<Vec<String>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.raw.clone()).collect())
            .collect()
    }
}
