use serde::{Deserialize, Serialize};

use gridsheet_core::{ValidationPolicy, DEFAULT_COLS, DEFAULT_ROWS};
use gridsheet_formula::RecalcMode;

/// Grid store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    /// Initial row count
    pub rows: usize,
    /// Initial column count
    pub cols: usize,
    /// What a rejected edit does to the cell
    pub validation_policy: ValidationPolicy,
    /// How formulas are re-evaluated after each mutation
    pub recalc_mode: RecalcMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            validation_policy: ValidationPolicy::Discard,
            recalc_mode: RecalcMode::Snapshot,
        }
    }
}

impl StoreConfig {
    pub fn with_size(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    pub fn with_validation_policy(mut self, policy: ValidationPolicy) -> Self {
        self.validation_policy = policy;
        self
    }

    pub fn with_recalc_mode(mut self, mode: RecalcMode) -> Self {
        self.recalc_mode = mode;
        self
    }
}
