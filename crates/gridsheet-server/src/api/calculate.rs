use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use gridsheet_formula::Aggregate;

/// Aggregate request: a function name and the values to fold
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    pub formula: String,
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CalculateResponse {
    pub result: f64,
}

/// Functions the relay will compute. COUNT stays local to the grid.
fn relay_function(name: &str) -> Option<Aggregate> {
    match Aggregate::from_name(name)? {
        Aggregate::Count => None,
        function => Some(function),
    }
}

/// Numbers pass through, numeric strings are parsed, everything else is 0
fn coerce(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

async fn calculate(Json(req): Json<CalculateRequest>) -> Result<Json<CalculateResponse>, AppError> {
    let function =
        relay_function(&req.formula).ok_or_else(|| AppError::InvalidFormula(req.formula.clone()))?;
    if req.values.is_empty() {
        return Err(AppError::BadRequest("values must not be empty".to_string()));
    }

    let values: Vec<f64> = req.values.iter().map(coerce).collect();
    let result = function.apply(&values);
    tracing::debug!(%function, count = values.len(), result, "calculated");

    Ok(Json(CalculateResponse { result }))
}

pub fn router() -> Router {
    Router::new().route("/calculate", post(calculate))
}
