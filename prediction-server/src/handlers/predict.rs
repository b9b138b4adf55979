//! Single prediction handler

use axum::{extract::State, Json};

use gas_inference_core::RawRecord;

use crate::{AppState, AppResult};
use crate::extract::AppJson;
use crate::models::PredictionResponse;

/// Predict gas output for one set of process parameters
pub async fn predict(
    State(state): State<AppState>,
    AppJson(record): AppJson<RawRecord>,
) -> AppResult<Json<PredictionResponse>> {
    let engine = state.engine.clone();
    let result = tokio::task::spawn_blocking(move || engine.predict(&record)).await??;

    Ok(Json(result.into()))
}
