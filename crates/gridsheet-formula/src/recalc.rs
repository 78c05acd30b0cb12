//! Recompute policy: re-derive every displayed value from raw text after a
//! grid mutation.

use serde::{Deserialize, Serialize};

use crate::dependency::DependencyGraph;
use crate::evaluator::Evaluator;
use crate::parser::parse_formula;
use gridsheet_core::{literal_value, CellCoord, CellError, CellValue, Grid};

/// How formula cells are re-evaluated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecalcMode {
    /// One pass against a snapshot taken at pass start. A formula reading
    /// another formula sees that cell's value from before the pass.
    #[default]
    Snapshot,
    /// Formula cells evaluated in dependency order against live values;
    /// cycles display `#CIRCULAR!`.
    Ordered,
}

/// What a recompute pass did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecalcSummary {
    /// Formula cells evaluated
    pub evaluated: usize,
    /// Formula cells left as circular references
    pub circular: usize,
}

/// Re-derive every cell's value from its raw text
pub fn recalculate(grid: &mut Grid, mode: RecalcMode) -> RecalcSummary {
    match mode {
        RecalcMode::Snapshot => recalculate_snapshot(grid),
        RecalcMode::Ordered => recalculate_ordered(grid),
    }
}

fn formula_cells(grid: &Grid) -> Vec<CellCoord> {
    grid.coords()
        .filter(|coord| grid.cell(*coord).is_some_and(|c| c.is_formula()))
        .collect()
}

fn recalculate_snapshot(grid: &mut Grid) -> RecalcSummary {
    let mut summary = RecalcSummary::default();

    let updates: Vec<(CellCoord, CellValue)> = {
        let snapshot: &Grid = grid;
        let evaluator = Evaluator::new(snapshot.rows(), snapshot.cols(), |row, col| {
            snapshot.value_at(row, col)
        });

        snapshot
            .coords()
            .filter_map(|coord| {
                let cell = snapshot.cell(coord)?;
                let value = if cell.is_formula() {
                    summary.evaluated += 1;
                    evaluator.evaluate(&cell.raw)
                } else {
                    literal_value(&cell.raw, snapshot.column_type(coord.col)?)
                };
                Some((coord, value))
            })
            .collect()
    };

    apply(grid, updates);
    summary
}

fn recalculate_ordered(grid: &mut Grid) -> RecalcSummary {
    let literals: Vec<(CellCoord, CellValue)> = grid
        .coords()
        .filter_map(|coord| {
            let cell = grid.cell(coord)?;
            if cell.is_formula() {
                return None;
            }
            Some((coord, literal_value(&cell.raw, grid.column_type(coord.col)?)))
        })
        .collect();
    apply(grid, literals);

    let formulas = formula_cells(grid);

    let mut graph = DependencyGraph::new();
    for coord in &formulas {
        let Some(cell) = grid.cell(*coord) else {
            continue;
        };
        if let Ok(call) = parse_formula(&cell.raw) {
            let deps = formulas
                .iter()
                .copied()
                .filter(|dep| call.range.contains(*dep))
                .collect();
            graph.set_dependencies(*coord, deps);
        }
    }

    let order = graph.evaluation_order(&formulas);
    let summary = RecalcSummary {
        evaluated: order.ordered.len(),
        circular: order.circular.len(),
    };

    for coord in order.ordered {
        let value = {
            let live: &Grid = grid;
            let evaluator =
                Evaluator::new(live.rows(), live.cols(), |row, col| live.value_at(row, col));
            live.cell(coord).map(|cell| evaluator.evaluate(&cell.raw))
        };
        if let (Some(value), Some(cell)) = (value, grid.cell_mut(coord)) {
            cell.value = value;
        }
    }

    apply(
        grid,
        order
            .circular
            .into_iter()
            .map(|coord| (coord, CellValue::Error(CellError::CircularReference)))
            .collect(),
    );

    summary
}

fn apply(grid: &mut Grid, updates: Vec<(CellCoord, CellValue)>) {
    for (coord, value) in updates {
        if let Some(cell) = grid.cell_mut(coord) {
            cell.value = value;
        }
    }
}
