//! Handles GET /health - liveness probe

use axum::response::Json as ResponseJson;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Liveness only; no backing dependencies are checked.
pub async fn health_handler() -> ResponseJson<HealthResponse> {
    ResponseJson(HealthResponse {
        status: "OK".to_string(),
    })
}
