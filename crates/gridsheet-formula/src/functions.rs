use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregate functions a formula may call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Aggregate {
    Sum,
    Average,
    Max,
    Min,
    Count,
}

impl Aggregate {
    pub const ALL: [Aggregate; 5] = [
        Aggregate::Sum,
        Aggregate::Average,
        Aggregate::Max,
        Aggregate::Min,
        Aggregate::Count,
    ];

    /// Look up a function by its exact (upper-case) name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Aggregate::Sum => "SUM",
            Aggregate::Average => "AVERAGE",
            Aggregate::Max => "MAX",
            Aggregate::Min => "MIN",
            Aggregate::Count => "COUNT",
        }
    }

    /// Compute the aggregate over already-coerced operands.
    ///
    /// `COUNT` counts non-zero operands, not non-empty cells: a text cell
    /// coerces to zero and is not counted. Empty input yields zero for every
    /// function.
    pub fn apply(&self, values: &[f64]) -> f64 {
        self.apply_padded(values, 0)
    }

    /// Like [`apply`](Self::apply) with `zeros` extra zero operands that are
    /// never materialized (range cells outside the grid).
    pub fn apply_padded(&self, values: &[f64], zeros: usize) -> f64 {
        let padding = (zeros > 0).then_some(0.0);
        match self {
            Aggregate::Sum => sum(values),
            Aggregate::Average => {
                let count = values.len().saturating_add(zeros);
                if count == 0 {
                    0.0
                } else {
                    sum(values) / count as f64
                }
            }
            Aggregate::Max => values
                .iter()
                .copied()
                .chain(padding)
                .reduce(f64::max)
                .unwrap_or(0.0),
            Aggregate::Min => values
                .iter()
                .copied()
                .chain(padding)
                .reduce(f64::min)
                .unwrap_or(0.0),
            Aggregate::Count => values.iter().filter(|v| **v != 0.0).count() as f64,
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}
