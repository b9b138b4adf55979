//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use gas_inference_core::EngineStatus;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    engine: EngineStatus,
}

/// "degraded" while the regressor is missing: the server is up but cannot predict
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let engine = state.engine.status();

    Json(HealthResponse {
        status: if engine.regressor_loaded { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        engine,
    })
}
