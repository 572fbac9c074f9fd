//! API route handlers
//!
//! - `health`: liveness probe
//! - `submission`: upload files and run them through MOSS
//! - `comparison`: read a pairwise comparison page

pub mod comparison;
pub mod health;
pub mod submission;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "simcheck",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/check-plagiarism",
            "/fetch-comparison",
            "/health"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
