use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Function name outside the relay's set
    #[error("Invalid formula: {0}")]
    InvalidFormula(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidFormula(name) => {
                tracing::debug!(formula = %name, "rejected formula");
                (StatusCode::BAD_REQUEST, "Invalid formula")
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
