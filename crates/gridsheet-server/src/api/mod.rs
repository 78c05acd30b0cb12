mod calculate;
mod health;

use axum::Router;

pub use calculate::{CalculateRequest, CalculateResponse};

/// Create the API router
pub fn router() -> Router {
    Router::new()
        .merge(health::router())
        .merge(calculate::router())
}
