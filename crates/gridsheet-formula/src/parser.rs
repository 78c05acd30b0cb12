//! Nom-based parser for `=FUNC(RANGE)` formulas.

use nom::{
    bytes::complete::take_while1,
    character::complete::char,
    combinator::all_consuming,
    sequence::{delimited, pair, preceded},
    IResult,
};
use thiserror::Error;

use crate::functions::Aggregate;
use gridsheet_core::{CellRange, FORMULA_MARKER};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Not a formula: {0:?}")]
    NotFormula(String),

    #[error("Expected FUNC(RANGE) in {0:?}")]
    Syntax(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Invalid range reference: {0:?}")]
    InvalidRange(String),
}

/// A parsed formula: one aggregate over one rectangular range
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaCall {
    pub function: Aggregate,
    /// Bounds as written; may extend past the grid
    pub range: CellRange,
}

fn function_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_uppercase())(input)
}

fn range_text(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != '(' && c != ')')(input)
}

fn call(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(
        char(FORMULA_MARKER),
        pair(function_name, delimited(char('('), range_text, char(')'))),
    )(input)
}

/// Parse raw cell text as a formula call
pub fn parse_formula(raw: &str) -> Result<FormulaCall, ParseError> {
    if !raw.starts_with(FORMULA_MARKER) {
        return Err(ParseError::NotFormula(raw.to_string()));
    }

    let (_, (name, range)) =
        all_consuming(call)(raw).map_err(|_| ParseError::Syntax(raw.to_string()))?;

    let function =
        Aggregate::from_name(name).ok_or_else(|| ParseError::UnknownFunction(name.to_string()))?;

    let range = CellRange::parse(range).ok_or_else(|| ParseError::InvalidRange(range.to_string()))?;

    Ok(FormulaCall { function, range })
}
