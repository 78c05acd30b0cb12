//! Per-column value types and the validation applied to edits.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

pub const NUMBER_ERROR: &str = "Must be a number";
pub const DATE_ERROR: &str = "Invalid date";

/// Classification of a column governing validation of its cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Text => write!(f, "text"),
            ColumnType::Number => write!(f, "number"),
            ColumnType::Date => write!(f, "date"),
        }
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ColumnType::Text),
            "number" => Ok(ColumnType::Number),
            "date" => Ok(ColumnType::Date),
            other => Err(format!("Unknown column type: {}", other)),
        }
    }
}

/// Outcome of validating raw text against a column type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// Blank input; valid for every type
    Empty,
    Valid(CellValue),
    Invalid(String),
}

/// What an edit does to the cell when validation fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Clear raw and value, attach the message
    #[default]
    Discard,
    /// Keep the previous raw and value, attach the message
    Retain,
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[+-]?\d*\.?\d+$").expect("static number pattern"))
}

/// Validate raw cell text against a column type
pub fn validate(text: &str, column_type: ColumnType) -> ValidationResult {
    if text.trim().is_empty() {
        return ValidationResult::Empty;
    }

    match column_type {
        ColumnType::Text => ValidationResult::Valid(CellValue::Text(text.to_string())),
        ColumnType::Number => {
            if !number_pattern().is_match(text) {
                return ValidationResult::Invalid(NUMBER_ERROR.to_string());
            }
            match text.parse::<f64>() {
                Ok(n) if n.is_finite() => ValidationResult::Valid(CellValue::Number(n)),
                _ => ValidationResult::Invalid(NUMBER_ERROR.to_string()),
            }
        }
        ColumnType::Date => match parse_date(text) {
            Some(date) => ValidationResult::Valid(CellValue::Date(date)),
            None => ValidationResult::Invalid(DATE_ERROR.to_string()),
        },
    }
}

/// Displayed value of non-formula raw text under the current column type.
///
/// Text that no longer conforms (the column type changed after entry) is
/// shown verbatim rather than cleared.
pub fn literal_value(raw: &str, column_type: ColumnType) -> CellValue {
    match validate(raw, column_type) {
        ValidationResult::Empty => CellValue::Empty,
        ValidationResult::Valid(value) => value,
        ValidationResult::Invalid(_) => CellValue::Text(raw.to_string()),
    }
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%b %d %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse a calendar date from the common textual forms
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}
