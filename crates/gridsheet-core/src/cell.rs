use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CellError;
use crate::format::CellFormat;

/// Leading character that marks a cell's raw text as a formula
pub const FORMULA_MARKER: char = '=';

/// The displayed (derived) value of a cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Error(CellError),
}

impl CellValue {
    /// Check if the value is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => parse_decimal(s),
            _ => None,
        }
    }

    /// Numeric view used for formula operands: anything that is not a
    /// number (including blank text) contributes zero.
    pub fn coerce_number(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }

    /// Get the value as display text
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Error(e) => e.to_string(),
        }
    }
}

/// Lenient decimal parse: surrounding whitespace ignored, empty text is zero,
/// non-finite results rejected.
fn parse_decimal(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// A single grid cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Exact text the user entered; authoritative for re-evaluation
    pub raw: String,
    /// Displayed value derived from `raw`
    pub value: CellValue,
    /// Validation message from the last rejected edit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub format: CellFormat,
}

impl Cell {
    /// Create a cell whose raw text is shown verbatim
    pub fn text(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let value = if raw.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(raw.clone())
        };
        Cell {
            raw,
            value,
            error: None,
            format: CellFormat::default(),
        }
    }

    /// Check if the raw text is a formula
    pub fn is_formula(&self) -> bool {
        is_formula(&self.raw)
    }

    /// Display text of the derived value
    pub fn display_value(&self) -> String {
        self.value.as_text()
    }

    /// Clear content, keeping formatting
    pub fn clear_content(&mut self) {
        self.raw.clear();
        self.value = CellValue::Empty;
    }

    /// Rewrite both raw text and displayed text through the same function
    pub fn map_text(&mut self, f: impl Fn(&str) -> String) {
        self.raw = f(&self.raw);
        self.value = match &self.value {
            CellValue::Text(s) => CellValue::Text(f(s)),
            other => other.clone(),
        };
    }
}

/// Check whether raw cell text is a formula
pub fn is_formula(raw: &str) -> bool {
    raw.starts_with(FORMULA_MARKER)
}
